//! Ports implemented by the storage backends

pub mod repository;

pub use repository::MailingListRepository;
