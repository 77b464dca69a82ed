//! integrated tests

mod bounds;
