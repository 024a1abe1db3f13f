pub mod analyze;
pub mod calibrate;
pub mod config;
pub mod flow;
pub mod info;
pub mod run;
