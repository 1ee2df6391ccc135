
/// The `Vpi` context: lookup, values, finish and vlog info.
pub mod context;



/// Value formats and conversions.
pub mod value;
