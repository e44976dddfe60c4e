//! Domain model for the Shodh contest client.

pub mod domain;
