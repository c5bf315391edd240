use chrono::NaiveDate;
use core_types::LotStatus;
use thiserror::Error;

/// Business-rule failures. None of them are transient, so none are retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Lot is {status} and does not accept new biometries")]
    LotNotAccepting { status: LotStatus },

    #[error("Biometry date {measured} precedes the stocking date {stocked}")]
    BiometryBeforeStocking { measured: NaiveDate, stocked: NaiveDate },

    #[error("At least {required} biometries are required, found {found}")]
    NotEnoughBiometries { required: usize, found: usize },

    #[error("Target date {target} is before the last biometry on {last}")]
    TargetBeforeLastBiometry { target: NaiveDate, last: NaiveDate },

    #[error("No positive daily weight gain is recorded, growth cannot be projected")]
    NoGrowthRate,

    #[error("Invalid shared cost allocation: {0}")]
    InvalidAllocation(String),

    #[error("The {0} is out of the representable range")]
    OutOfRange(&'static str),
}
