//! Unopinionated standalone utilities.

mod data_dir;
pub use data_dir::read_data_dir;

mod geom;
pub use geom::{VecExt, DIR_4};

mod path;
pub use path::{dijkstra_map, flood_fill_4};

mod rng;
pub use rng::{srng, Logos};

pub type FastHasher = rustc_hash::FxHasher;

/// Map with an efficient hash function.
pub use rustc_hash::FxHashMap as HashMap;

/// Set with an efficient hash function.
pub use rustc_hash::FxHashSet as HashSet;

type DefaultHashBuilder = std::hash::BuildHasherDefault<rustc_hash::FxHasher>;

/// Insertion order preserving map with an efficient hash function.
pub type IndexMap<K, V> = indexmap::IndexMap<K, V, DefaultHashBuilder>;

/// Good default concrete rng.
pub type GameRng = rand_xorshift::XorShiftRng;
