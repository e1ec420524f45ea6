//! In-memory [`FileAccess`] for hosts that already hold a directory listing.
//!
//! Listing and read failures can be attached to any node.

use sneakerzone_core::error::AccessError;
use sneakerzone_core::traits::{Entry, EntryKind, FileAccess};
use sneakerzone_core::SourceRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

type Failure = Box<dyn Fn() -> AccessError + Send + Sync>;

struct Node {
    name: String,
    kind: EntryKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    list_failure: Option<Failure>,
    read_failure: Option<Failure>,
}

pub struct MemoryAccess {
    nodes: Vec<Node>,
}

impl Default for MemoryAccess {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryAccess {
    pub fn new() -> Self {
        let root = Node {
            name: String::new(),
            kind: EntryKind::Directory,
            parent: None,
            children: Vec::new(),
            list_failure: None,
            read_failure: None,
        };
        Self { nodes: vec![root] }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn add_dir(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.add(parent, name, EntryKind::Directory)
    }

    pub fn add_file(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.add(parent, name, EntryKind::File)
    }

    pub fn add_files(&mut self, parent: NodeId, names: &[&str]) {
        for name in names {
            self.add_file(parent, name);
        }
    }

    /// Every listing of `dir` fails with whatever `make` builds.
    pub fn fail_listing(&mut self, dir: NodeId, make: impl Fn() -> AccessError + Send + Sync + 'static) {
        self.nodes[dir.0].list_failure = Some(Box::new(make));
    }

    /// Every read of `file` fails with whatever `make` builds.
    pub fn fail_read(&mut self, file: NodeId, make: impl Fn() -> AccessError + Send + Sync + 'static) {
        self.nodes[file.0].read_failure = Some(Box::new(make));
    }

    /// Slash-joined path from the root.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut cur = Some(id);
        while let Some(node_id) = cur {
            let node = &self.nodes[node_id.0];
            if node.parent.is_some() {
                parts.push(node.name.as_str());
            }
            cur = node.parent;
        }
        parts.reverse();
        parts.join("/")
    }

    fn add(&mut self, parent: NodeId, name: &str, kind: EntryKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.to_string(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
            list_failure: None,
            read_failure: None,
        });
        self.nodes[parent.0].children.push(id);
        id
    }
}

impl FileAccess for MemoryAccess {
    type Handle = NodeId;

    fn list_entries(&self, dir: &NodeId) -> Result<Vec<Entry<NodeId>>, AccessError> {
        let node = self
            .nodes
            .get(dir.0)
            .ok_or_else(|| AccessError::NotFound(format!("node {}", dir.0)))?;
        if let Some(fail) = &node.list_failure {
            return Err(fail());
        }
        if node.kind != EntryKind::Directory {
            return Err(AccessError::Fault(format!("'{}' is not a directory", self.path_of(*dir))));
        }
        Ok(node
            .children
            .iter()
            .map(|&child| {
                let c = &self.nodes[child.0];
                Entry { name: c.name.clone(), kind: c.kind, handle: child }
            })
            .collect())
    }

    fn read_displayable(&self, file: &NodeId) -> Result<SourceRef, AccessError> {
        let node = self
            .nodes
            .get(file.0)
            .ok_or_else(|| AccessError::NotFound(format!("node {}", file.0)))?;
        if let Some(fail) = &node.read_failure {
            return Err(fail());
        }
        Ok(SourceRef::new(format!("mem://{}", self.path_of(*file))))
    }
}
