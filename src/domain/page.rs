use std::cmp::Ordering;

use thiserror::Error;

use super::field::Field;
use super::publisher::Publisher;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    #[error("unknown sort property '{0}'")]
    UnknownSortProperty(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("asc") {
            Some(Direction::Asc)
        } else if raw.eq_ignore_ascii_case("desc") {
            Some(Direction::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub field: Field,
    pub direction: Direction,
}

impl Order {
    pub fn asc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: Field) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Ordered list of sort keys; earlier orders take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    pub fn by(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn compare(&self, a: &Publisher, b: &Publisher) -> Ordering {
        self.orders
            .iter()
            .map(|order| match order.direction {
                Direction::Asc => order.field.compare(a, b),
                Direction::Desc => order.field.compare(b, a),
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Parses one `sort` parameter: `property[,property...][,asc|desc]`.
    fn push_param(&mut self, raw: &str) -> Result<(), PageError> {
        let mut parts: Vec<&str> = raw.split(',').map(str::trim).filter(|p| !p.is_empty()).collect();
        let direction = match parts.last().and_then(|last| Direction::parse(last)) {
            Some(direction) => {
                parts.pop();
                direction
            }
            None => Direction::Asc,
        };

        for property in parts {
            let field = Field::parse(property)
                .ok_or_else(|| PageError::UnknownSortProperty(property.to_string()))?;
            self.orders.push(Order { field, direction });
        }
        Ok(())
    }
}

/// Bounds applied when reading a page request from query parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_size: DEFAULT_PAGE_SIZE,
            max_size: MAX_PAGE_SIZE,
        }
    }
}

/// Page request: zero-based page index, page size and sort order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pageable {
    pub page: u32,
    pub size: u32,
    pub sort: Sort,
}

impl Pageable {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> usize {
        self.page as usize * self.size as usize
    }

    /// Reads `page`, `size` and `sort` from query parameters.
    ///
    /// Missing or malformed `page`/`size` values fall back to defaults and
    /// `size` is capped at `limits.max_size`. Unknown sort properties are
    /// rejected.
    pub fn from_query_pairs<'a, I>(pairs: I, limits: PageLimits) -> Result<Self, PageError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut page = 0;
        let mut size = limits.default_size;
        let mut sort = Sort::unsorted();

        for (key, value) in pairs {
            match key {
                "page" => page = value.trim().parse().unwrap_or(0),
                "size" => {
                    size = match value.trim().parse::<u32>() {
                        Ok(0) | Err(_) => limits.default_size,
                        Ok(requested) => requested.min(limits.max_size),
                    }
                }
                "sort" => sort.push_param(value)?,
                _ => {}
            }
        }

        Ok(Self::new(page, size).with_sort(sort))
    }
}

impl Default for Pageable {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// One slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, pageable: &Pageable, total_elements: u64) -> Self {
        Self {
            content,
            number: pageable.page,
            size: pageable.size,
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.size == 0 {
            return 1;
        }
        self.total_elements.div_ceil(u64::from(self.size))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn has_previous(&self) -> bool {
        self.number > 0
    }

    pub fn into_content(self) -> Vec<T> {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pageable(query: &[(&str, &str)]) -> Result<Pageable, PageError> {
        Pageable::from_query_pairs(query.iter().copied(), PageLimits::default())
    }

    #[test]
    fn defaults_when_absent() {
        let parsed = pageable(&[]).unwrap();
        assert_eq!(parsed, Pageable::new(0, DEFAULT_PAGE_SIZE));
        assert!(parsed.sort.is_unsorted());
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let parsed = pageable(&[("page", "-1"), ("size", "lots")]).unwrap();
        assert_eq!(parsed.page, 0);
        assert_eq!(parsed.size, DEFAULT_PAGE_SIZE);

        let parsed = pageable(&[("size", "0")]).unwrap();
        assert_eq!(parsed.size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn size_is_capped() {
        let limits = PageLimits {
            default_size: 10,
            max_size: 50,
        };
        let parsed = Pageable::from_query_pairs([("page", "3"), ("size", "500")], limits).unwrap();
        assert_eq!(parsed.page, 3);
        assert_eq!(parsed.size, 50);
        assert_eq!(parsed.offset(), 150);
    }

    #[test]
    fn parses_sort_parameters() {
        let parsed = pageable(&[("sort", "name,DESC"), ("sort", "id")]).unwrap();
        assert_eq!(
            parsed.sort.orders(),
            &[Order::desc(Field::Name), Order::asc(Field::Id)]
        );

        let parsed = pageable(&[("sort", "name,id,desc")]).unwrap();
        assert_eq!(
            parsed.sort.orders(),
            &[Order::desc(Field::Name), Order::desc(Field::Id)]
        );
    }

    #[test]
    fn rejects_unknown_sort_property() {
        let err = pageable(&[("sort", "founded,asc")]).unwrap_err();
        assert_eq!(err, PageError::UnknownSortProperty("founded".to_string()));
    }

    #[test]
    fn sort_compares_with_precedence() {
        let sort = Sort::by(vec![Order::asc(Field::Name), Order::desc(Field::Id)]);
        let a = Publisher::new("Penguin").with_id(1);
        let b = Publisher::new("Penguin").with_id(2);
        let c = Publisher::new("Abrams").with_id(3);

        let mut items = vec![a.clone(), b.clone(), c.clone()];
        items.sort_by(|x, y| sort.compare(x, y));
        assert_eq!(items, vec![c, b, a]);
    }

    #[test]
    fn page_metadata() {
        let page = Page::new(vec![1, 2], &Pageable::new(1, 2), 5);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next());
        assert!(page.has_previous());

        let last = Page::new(vec![5], &Pageable::new(2, 2), 5);
        assert!(!last.has_next());

        let empty: Page<u8> = Page::new(vec![], &Pageable::default(), 0);
        assert_eq!(empty.total_pages(), 0);
        assert!(!empty.has_next());
        assert!(!empty.has_previous());
    }
}
