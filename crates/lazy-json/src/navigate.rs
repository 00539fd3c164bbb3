//! Applying path steps to cells.

use lazy_json_path::{PathStep, SmartPath};

use crate::tree::{CellId, Tree};

impl Tree {
    /// Apply one step to `id`.
    ///
    /// A string holding valid JSON is stepped through first. A key names an
    /// array element when the node is array-shaped and the key is an integer.
    pub(crate) fn step(&mut self, id: CellId, step: &PathStep) -> CellId {
        let id = self.unwrap_embedded(id);
        match step {
            PathStep::Key(key) => {
                if self.is_array(id) {
                    if let Ok(index) = key.parse::<isize>() {
                        return self.array_index(id, index);
                    }
                }
                self.object_index(id, key)
            }
            PathStep::Index(index) => self.array_index(id, *index),
        }
    }

    pub(crate) fn navigate(&mut self, id: CellId, path: &SmartPath) -> CellId {
        path.steps().iter().fold(id, |id, step| self.step(id, step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(tree: &mut Tree, id: CellId, path: &str) -> CellId {
        let path = SmartPath::parse(path).unwrap();
        tree.navigate(id, &path)
    }

    #[test]
    fn test_numeric_key_on_array() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"{"a":[10,20]}"#.to_vec(), None);
        let second = walk(&mut tree, id, "a.1");
        assert_eq!(tree.raw(second), b"20");
        let last = walk(&mut tree, id, "a[-1]");
        assert_eq!(tree.raw(last), b"20");
    }

    #[test]
    fn test_numeric_key_on_object() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"{"1":"one"}"#.to_vec(), None);
        let one = walk(&mut tree, id, "1");
        assert_eq!(tree.raw(one), b"\"one\"");
    }

    #[test]
    fn test_steps_through_embedded_json() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"{"data":"{\"list\":[1,2]}"}"#.to_vec(), None);
        let el = walk(&mut tree, id, "data.list[1]");
        assert_eq!(tree.raw(el), b"2");
    }

    #[test]
    fn test_root_index() {
        let mut tree = Tree::new();
        let id = tree.new_cell(br#"[{"a":"x"}]"#.to_vec(), None);
        let a = walk(&mut tree, id, "[0].a");
        assert_eq!(tree.raw(a), b"\"x\"");
    }
}
