pub mod calibration;
pub mod consts;
pub mod context;
pub mod error;
pub mod field;
pub mod flow;
pub mod interp;
pub mod io;
pub mod pipeline;
pub mod point;
pub mod section;
pub mod selection;
