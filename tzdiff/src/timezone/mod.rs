pub mod clock;
pub mod difference;
pub mod registry;

pub use clock::{Clock, FixedClock, SystemClock};
pub use difference::{compute_difference, ClockArithmetic, TimeDiffError, TimeDifference};
pub use registry::{Registry, RegistryError, Timezone};
