/// Predicate selecting the branches an environment applies to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BranchFilter {
    /// Matches no branch
    #[default]
    None,
    /// Matches only the listed branches
    Only(Vec<String>),
    /// Matches every branch except the listed ones
    Ignore(Vec<String>),
}

impl BranchFilter {
    pub fn only<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BranchFilter::Only(branches.into_iter().map(Into::into).collect())
    }

    pub fn ignore<I, S>(branches: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        BranchFilter::Ignore(branches.into_iter().map(Into::into).collect())
    }

    /// Check whether the branch is selected by this filter
    pub fn is_match(&self, branch: &str) -> bool {
        match self {
            BranchFilter::None => false,
            BranchFilter::Only(branches) => branches.iter().any(|b| b == branch),
            BranchFilter::Ignore(branches) => !branches.iter().any(|b| b == branch),
        }
    }
}
