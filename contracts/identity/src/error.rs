use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum IdentityError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    ClaimNotFound = 4,
    EmptySignature = 5,
}
