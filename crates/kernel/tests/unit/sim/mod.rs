
/// Clock generator routine.
pub mod clock;
