/// A list of items read through a cyclic cursor.
///
/// Each call to [`next_item`](Self::next_item) hands out the item under the
/// cursor and advances it, wrapping to the start once the cursor passes the
/// end of the list or the configured ceiling, whichever comes first. A fresh
/// `Rotation` always starts at zero, so replacing the payload resets the cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct Rotation<T> {
    items: Vec<T>,
    cursor: usize,
    ceiling: usize,
}

impl<T> Rotation<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self::with_ceiling(items, usize::MAX)
    }

    pub fn with_ceiling(items: Vec<T>, ceiling: usize) -> Self {
        Self {
            items,
            cursor: 0,
            ceiling: ceiling.max(1),
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn limit(&self) -> usize {
        self.items.len().min(self.ceiling)
    }

    /// Returns the item under the cursor and advances it.
    pub fn next_item(&mut self) -> Option<&T> {
        let limit = self.limit();
        if limit == 0 {
            return None;
        }
        if self.cursor >= limit {
            self.cursor = 0;
        }
        let index = self.cursor;
        self.cursor += 1;
        if self.cursor >= limit {
            self.cursor = 0;
        }
        self.items.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycles_through_items() {
        let mut rotation = Rotation::new(vec!["a", "b", "c"]);
        let seen: Vec<&str> = (0..7).map(|_| *rotation.next_item().unwrap()).collect();
        assert_eq!(seen, vec!["a", "b", "c", "a", "b", "c", "a"]);
    }

    #[test]
    fn test_ceiling_wraps_before_list_end() {
        let mut rotation = Rotation::with_ceiling((0..20).collect::<Vec<u32>>(), 15);
        for expected in 0..15 {
            assert_eq!(rotation.next_item(), Some(&expected));
        }
        assert_eq!(rotation.cursor(), 0);
        assert_eq!(rotation.next_item(), Some(&0));
    }

    #[test]
    fn test_new_rotation_starts_at_zero() {
        let mut rotation = Rotation::new(vec![1, 2, 3]);
        rotation.next_item();
        rotation.next_item();
        assert_eq!(rotation.cursor(), 2);

        rotation = Rotation::new(vec![7, 8]);
        assert_eq!(rotation.cursor(), 0);
        assert_eq!(rotation.next_item(), Some(&7));
    }

    #[test]
    fn test_empty_rotation_yields_nothing() {
        let mut rotation: Rotation<String> = Rotation::new(Vec::new());
        assert!(rotation.next_item().is_none());
        assert!(rotation.is_empty());
    }
}
