//! One file per group of insertion modes. Each handler takes the current
//! token and returns whether the driver must reprocess it.

mod after;
mod body;
mod head;
mod select;
mod table;
