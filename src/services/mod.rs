pub mod candidates;
pub mod catalog;
pub mod controller;
pub mod library;
pub mod providers;
pub mod recommendations;
pub mod resolver;
pub mod selection;
pub mod servers;
pub mod watchlist;

pub use catalog::Catalog;
pub use controller::{PlaybackController, SearchOutcome};
pub use library::VideoLibrary;
pub use providers::{OmdbProvider, SearchProvider};
pub use recommendations::{CatalogRecommender, Recommender};
pub use servers::ServerRegistry;
pub use watchlist::WatchlistStore;
