pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;

pub const OBJECT_ID_LENGTH: usize = 40;
