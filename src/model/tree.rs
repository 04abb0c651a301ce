use serde::{Deserialize, Serialize};

/// A node in a flattened regression tree.
///
/// Traversal goes to `left` when `x[feature] <= threshold`, else `right`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl Node {
    pub fn split(feature: usize, threshold: f64, left: usize, right: usize) -> Self {
        Self::Split {
            feature,
            threshold,
            left,
            right,
        }
    }

    pub fn leaf(value: f64) -> Self {
        Self::Leaf { value }
    }
}

/// A regression tree stored as a flat node array with the root at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

impl Tree {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Check the tree is well-formed for inputs of `width` features.
    ///
    /// Every child index must point past its parent, which rules out cycles
    /// and guarantees [`Tree::evaluate`] terminates. No node may have more
    /// than one parent.
    pub fn validate(&self, width: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }

        let mut referenced = vec![false; self.nodes.len()];

        for (index, node) in self.nodes.iter().enumerate() {
            match *node {
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= width {
                        return Err(format!(
                            "node {} splits on feature {} but inputs have {} features",
                            index, feature, width
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has a NaN threshold", index));
                    }
                    for child in [left, right] {
                        if child <= index || child >= self.nodes.len() {
                            return Err(format!(
                                "node {} has invalid child index {}",
                                index, child
                            ));
                        }
                        if std::mem::replace(&mut referenced[child], true) {
                            return Err(format!(
                                "node {} is referenced by more than one parent",
                                child
                            ));
                        }
                    }
                }
                Node::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has a non-finite value", index));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf and return its value.
    ///
    /// The tree must have passed [`Tree::validate`] for `x.len()` features.
    pub fn evaluate(&self, x: &[f64]) -> f64 {
        let mut index = 0;
        loop {
            match self.nodes[index] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if x[feature] <= threshold { left } else { right };
                }
            }
        }
    }

    /// Longest root-to-leaf path, counted in nodes.
    ///
    /// Children sit after their parents, so one backward pass sees every
    /// child's depth before the parent's.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        for index in (0..self.nodes.len()).rev() {
            depths[index] = match self.nodes[index] {
                Node::Leaf { .. } => 1,
                Node::Split { left, right, .. } => {
                    let left = depths.get(left).copied().unwrap_or(0);
                    let right = depths.get(right).copied().unwrap_or(0);
                    1 + left.max(right)
                }
            };
        }
        depths.first().copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump() -> Tree {
        Tree::new(vec![
            Node::split(0, 50.0, 1, 2),
            Node::leaf(100.0),
            Node::leaf(200.0),
        ])
    }

    #[test]
    fn evaluate_goes_left_on_equal() {
        let tree = stump();
        assert_eq!(tree.evaluate(&[50.0]), 100.0);
        assert_eq!(tree.evaluate(&[50.5]), 200.0);
    }

    #[test]
    fn single_leaf_ignores_input() {
        let tree = Tree::new(vec![Node::leaf(42.0)]);
        assert_eq!(tree.evaluate(&[]), 42.0);
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    fn validate_accepts_well_formed_tree() {
        assert_eq!(stump().validate(1), Ok(()));
        assert_eq!(stump().depth(), 2);
    }

    #[test]
    fn validate_rejects_backward_child() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, 1, 2),
            Node::leaf(1.0),
            Node::split(0, 1.0, 1, 0),
        ]);
        assert!(tree.validate(1).unwrap_err().contains("child index"));
    }

    #[test]
    fn validate_rejects_dangling_child() {
        let tree = Tree::new(vec![Node::split(0, 1.0, 1, 5), Node::leaf(1.0)]);
        assert!(tree.validate(1).is_err());
    }

    #[test]
    fn validate_rejects_shared_children() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, 1, 1),
            Node::leaf(1.0),
        ]);
        assert!(tree.validate(1).unwrap_err().contains("more than one parent"));

        let tree = Tree::new(vec![
            Node::split(0, 1.0, 1, 2),
            Node::split(0, 2.0, 3, 4),
            Node::split(0, 0.5, 3, 4),
            Node::leaf(1.0),
            Node::leaf(2.0),
        ]);
        assert!(tree.validate(1).unwrap_err().contains("node 3"));
    }

    #[test]
    fn depth_of_long_shared_chain_is_linear() {
        let mut nodes: Vec<Node> = (0..200).map(|i| Node::split(0, 1.0, i + 1, i + 1)).collect();
        nodes.push(Node::leaf(1.0));
        let tree = Tree::new(nodes);

        assert!(tree.validate(1).is_err());
        assert_eq!(tree.depth(), 201);
    }

    #[test]
    fn depth_takes_the_longest_branch() {
        let tree = Tree::new(vec![
            Node::split(0, 1.0, 1, 2),
            Node::leaf(1.0),
            Node::split(0, 2.0, 3, 4),
            Node::leaf(2.0),
            Node::leaf(3.0),
        ]);
        assert_eq!(tree.validate(1), Ok(()));
        assert_eq!(tree.depth(), 3);
    }

    #[test]
    fn validate_rejects_feature_beyond_width() {
        assert!(stump().validate(0).unwrap_err().contains("feature 0"));
    }

    #[test]
    fn validate_rejects_empty_tree() {
        assert!(Tree::new(vec![]).validate(3).is_err());
    }

    #[test]
    fn nodes_deserialize_from_tagged_json() {
        let tree: Tree = serde_json::from_str(
            r#"{"nodes":[
                {"kind":"split","feature":0,"threshold":1.5,"left":1,"right":2},
                {"kind":"leaf","value":1.0},
                {"kind":"leaf","value":2.0}
            ]}"#,
        )
        .unwrap();
        assert_eq!(tree.nodes[0], Node::split(0, 1.5, 1, 2));
        assert_eq!(tree.nodes[2], Node::leaf(2.0));
    }
}
