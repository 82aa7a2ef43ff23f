use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum TokenError {
    AlreadyInitialized = 1,
    NotInitialized = 2,
    Unauthorized = 3,
    InvalidAmount = 4,
    InsufficientBalance = 5,
    InsufficientAllowance = 6,
    TokenPaused = 7,
    TokenNotPaused = 8,
    SenderAddressFrozen = 9,
    RecipientAddressFrozen = 10,
    InsufficientUnfrozenBalance = 11,
    FreezeExceedsBalance = 12,
    UnfreezeExceedsFrozen = 13,
    RecipientNotVerified = 14,
    ComplianceCheckFailed = 15,
    InsufficientCollateral = 16,
    ModuleAlreadyAdded = 17,
    ModuleNotFound = 18,
    InvalidModuleParams = 19,
    InvalidLostWallet = 20,
    NoTokensToRecover = 21,
    ArrayLengthMismatch = 22,
}
