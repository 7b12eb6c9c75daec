use std::sync::Arc;

use crate::catalog;

pub type Catalog = Arc<catalog::Catalog>;

#[derive(Clone)]
pub struct Service {
	pub catalog: Catalog,
}
