pub mod climate;
pub mod diurnal_period;
pub mod observation;
