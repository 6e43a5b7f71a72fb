//! UI module - reusable widgets shared by the app panels

pub mod components;
