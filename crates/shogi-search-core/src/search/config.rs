//! Search configuration, `serde`-derived so an embedder can load it
//! from a USI `setoption`-style key/value source without this crate
//! depending on any particular protocol.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub max_depth: i32,
    pub tree_size: i32,
    pub worker_size: i32,
    pub limit_enable: bool,
    pub limit_seconds: f64,
    pub ponder: bool,
}

impl Config {
    pub const DEFAULT_MAX_DEPTH: i32 = 7;

    /// `treeSize = 4 * workerSize - 3` (`Searcher::standardTreeSize`):
    /// the smallest tree-pool size that lets every worker own a tree
    /// plus enough spares for one split per worker below it.
    pub fn standard_tree_size(worker_size: i32) -> i32 {
        worker_size * 4 - 3
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            tree_size: 1,
            worker_size: 1,
            limit_enable: true,
            limit_seconds: 10.0,
            ponder: false,
        }
    }
}
