mod idle;

pub use idle::{IdleSensor, SystemIdleSensor};
