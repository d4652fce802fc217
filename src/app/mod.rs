pub mod controller;
pub mod journal;
pub mod single;
pub mod wait_group;
pub mod worker;
