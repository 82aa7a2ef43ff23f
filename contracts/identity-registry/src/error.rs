use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum RegistryError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    IdentityAlreadyRegistered = 4,
    IdentityNotRegistered = 5,
    WalletAlreadyMarkedAsLost = 6,
    ArrayLengthMismatch = 7,
}
