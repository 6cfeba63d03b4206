//! Best-effort mapping of a free-text query onto the catalog taxonomy.

use serde::Deserialize;

/// One node of the catalog's category tree.
#[derive(Debug, Clone, Deserialize)]
pub struct TaxonomyNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<TaxonomyNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryMatch {
    pub id: String,
    pub name: String,
    pub path: String,
    pub score: u32,
}

/// Walk the tree and score every category against the query terms: 10 per
/// term contained in the node name, 5 extra when the path runs through
/// Electronics, and 2 per level of depth so more specific categories win.
/// Returns the highest-scoring match, first-seen on ties.
pub fn best_category(nodes: &[TaxonomyNode], query: &str) -> Option<CategoryMatch> {
    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if terms.is_empty() {
        return None;
    }

    let mut matches = Vec::new();
    walk(nodes, "", &terms, &mut matches);
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches.into_iter().next()
}

fn walk(nodes: &[TaxonomyNode], parent_path: &str, terms: &[String], out: &mut Vec<CategoryMatch>) {
    for node in nodes {
        let path = if parent_path.is_empty() {
            node.name.clone()
        } else {
            format!("{} > {}", parent_path, node.name)
        };
        let name_lower = node.name.to_lowercase();
        let depth = path.matches('>').count() as u32;

        let mut score = 0;
        for term in terms {
            if name_lower.contains(term.as_str()) {
                score += 10;
                if path.contains("Electronics") {
                    score += 5;
                }
                score += depth * 2;
            }
        }

        if score > 0 {
            out.push(CategoryMatch {
                id: node.id.clone(),
                name: node.name.clone(),
                path: path.clone(),
                score,
            });
        }

        walk(&node.children, &path, terms, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str, name: &str, children: Vec<TaxonomyNode>) -> TaxonomyNode {
        TaxonomyNode {
            id: id.to_string(),
            name: name.to_string(),
            children,
        }
    }

    fn sample_tree() -> Vec<TaxonomyNode> {
        vec![
            node(
                "3944",
                "Electronics",
                vec![
                    node("3951", "Laptops", vec![node("1089430", "Gaming Laptops", vec![])]),
                    node("1105910", "Audio", vec![node("133251", "Headphones", vec![])]),
                ],
            ),
            node(
                "4044",
                "Home",
                vec![node("90548", "Kitchen Appliances", vec![node("90546", "Coffee Makers", vec![])])],
            ),
        ]
    }

    #[test]
    fn test_deeper_categories_outscore_shallow_ones() {
        let best = best_category(&sample_tree(), "gaming laptops").unwrap();
        assert_eq!(best.id, "1089430");
        assert_eq!(best.path, "Electronics > Laptops > Gaming Laptops");
    }

    #[test]
    fn test_electronics_branch_gets_a_bonus() {
        // "makers" matches Coffee Makers at depth 2; "headphones" matches at
        // depth 2 inside Electronics, which adds 5 on top.
        let tree = sample_tree();
        let coffee = best_category(&tree, "makers").unwrap();
        assert_eq!(coffee.id, "90546");
        assert_eq!(coffee.score, 14);

        let headphones = best_category(&tree, "headphones").unwrap();
        assert_eq!(headphones.id, "133251");
        assert_eq!(headphones.score, 19);
    }

    #[test]
    fn test_no_match_yields_none() {
        assert_eq!(best_category(&sample_tree(), "garden hose"), None);
    }

    #[test]
    fn test_empty_query_yields_none() {
        assert_eq!(best_category(&sample_tree(), "   "), None);
    }
}
