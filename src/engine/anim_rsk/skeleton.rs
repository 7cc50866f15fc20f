use glam::Mat4;

// Strict tree, children are owned
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonNode
{
    pub name: String,
    pub transform: Mat4, // local bind transform, used when no sampler animates this node
    pub children: Vec<SkeletonNode>,
}
impl SkeletonNode
{
    #[must_use]
    pub fn new(name: impl Into<String>, transform: Mat4) -> Self
    {
        Self
        {
            name: name.into(),
            transform,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_child(mut self, child: SkeletonNode) -> Self
    {
        self.children.push(child);
        self
    }

    // Depth-first
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&SkeletonNode>
    {
        if self.name == name
        {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    #[must_use]
    pub fn node_count(&self) -> usize
    {
        1 + self.children.iter().map(SkeletonNode::node_count).sum::<usize>()
    }

    // Visits every node, parents before children
    pub fn visit(&self, visitor: &mut impl FnMut(&SkeletonNode))
    {
        visitor(self);
        for child in &self.children
        {
            child.visit(visitor);
        }
    }
}
