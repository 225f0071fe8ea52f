pub mod constituents;
pub mod prices;
pub mod table;
