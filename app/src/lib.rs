pub mod controller;
pub mod input;
pub mod run;
pub mod ui;
