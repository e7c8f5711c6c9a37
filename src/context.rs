use crate::catalog::CatalogRef;

/// The context of the query being optimized. It is handed to the statistics propagation pass
/// and to the table functions it calls.
#[derive(Debug, Clone)]
pub struct QueryContext {
    catalog: CatalogRef,
}

impl QueryContext {
    /// Creates a context of a query that reads tables from the given catalog.
    pub fn new(catalog: CatalogRef) -> Self {
        QueryContext { catalog }
    }

    /// The database catalog.
    pub fn catalog(&self) -> &CatalogRef {
        &self.catalog
    }
}
