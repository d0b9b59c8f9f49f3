pub mod room_repo;

pub use room_repo::RoomRepo;
