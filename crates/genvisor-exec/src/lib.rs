mod proc;
pub use proc::ProcGenerator;
