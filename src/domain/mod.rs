//! Domain model for the publisher resource: the entity itself, the criteria
//! used to filter it and the page types used to slice query results.

pub mod criteria;
pub mod field;
pub mod page;
pub mod publisher;

pub use criteria::{CriteriaError, FilterValue, Operator, PublisherCriteria, Specification};
pub use field::Field;
pub use page::{Direction, Order, Page, PageError, PageLimits, Pageable, Sort};
pub use publisher::{ENTITY_NAME, NAME_MAX_LENGTH, Publisher, PublisherPatch};
