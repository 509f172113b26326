/// Where parsed entries land: the sectionless top level or a named section.
///
/// `Named("")` comes from a `[]` header and is distinct from `Global`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub enum SectionId {
    #[default]
    Global,
    Named(String),
}

impl SectionId {
    pub fn name(&self) -> Option<&str> {
        match self {
            SectionId::Global => None,
            SectionId::Named(name) => Some(name),
        }
    }
}
