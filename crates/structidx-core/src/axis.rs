/// XPath structural axes. Only the variants named in the descendant-axis
/// and ancestor-axis filters below actually change core branching; the rest
/// are accepted to keep the enum complete for callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    SelfAxis,
    Parent,
    Child,
    Attribute,
    Descendant,
    DescendantSelf,
    DescendantAttribute,
    Ancestor,
    AncestorSelf,
}
