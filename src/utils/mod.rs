pub(crate) mod clock;
pub(crate) mod debug;
pub(crate) mod timezone;

pub(crate) use clock::{Clock, SystemClock};
pub(crate) use debug::{debug_log, set_debug};
pub(crate) use timezone::Timezone;
