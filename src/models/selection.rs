//! Tree positions: paths, points and ranges
//!
//! A path is the list of child indexes from the root to a node. A point is a
//! text leaf path plus a character offset inside that leaf.

use serde::{Deserialize, Serialize};

pub type Path = Vec<usize>;

/// A caret position inside a text leaf
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub path: Path,
    pub offset: usize,
}

impl Point {
    pub fn new(path: Path, offset: usize) -> Self {
        Self { path, offset }
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.path
            .cmp(&other.path)
            .then(self.offset.cmp(&other.offset))
    }
}

/// A selection; anchor is where it started, focus where it ends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub anchor: Point,
    pub focus: Point,
}

impl Range {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    /// A caret: anchor and focus at the same point
    pub fn collapsed(point: Point) -> Self {
        Self {
            anchor: point.clone(),
            focus: point,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    pub fn is_expanded(&self) -> bool {
        !self.is_collapsed()
    }

    /// Earlier of the two points in document order
    pub fn start(&self) -> &Point {
        std::cmp::min(&self.anchor, &self.focus)
    }

    pub fn end(&self) -> &Point {
        std::cmp::max(&self.anchor, &self.focus)
    }
}

/// True when `ancestor` is a strict prefix of `path`
pub fn is_ancestor(ancestor: &[usize], path: &[usize]) -> bool {
    ancestor.len() < path.len() && path.starts_with(ancestor)
}

/// All strict ancestors of `path`, outermost first, excluding the root
pub fn ancestors(path: &[usize]) -> impl Iterator<Item = &[usize]> {
    (1..path.len()).map(move |len| &path[..len])
}

/// Path of the next sibling
pub fn next_sibling(path: &[usize]) -> Option<Path> {
    let (last, parent) = path.split_last()?;
    let mut next = parent.to_vec();
    next.push(last + 1);
    Some(next)
}
