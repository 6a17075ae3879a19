//! Nested ⇄ flat transformation for spreadsheet/BI consumers.
//!
//! Object keys are joined with `.`, array items are addressed with a
//! zero-based `[n]` suffix and null leaves are dropped, so
//! `{"A": {"B": ["x", "y"]}}` flattens to `{"A.B[0]": "x", "A.B[1]": "y"}`.

use crate::convert::node::Node;
use crate::convert::tree::ATTRIBUTES_KEY;
use crate::convert::{PRODUCTS_TAG, PRODUCT_TAG};

const SEPARATOR: char = '.';

/// Flattens a node into `(path, scalar)` pairs in document order.
pub fn flatten(node: &Node) -> Vec<(String, Node)> {
    let mut out = Vec::new();
    flatten_into(node, "", &mut out);
    out
}

fn flatten_into(node: &Node, prefix: &str, out: &mut Vec<(String, Node)>) {
    match node {
        Node::Null => {}
        Node::Scalar(value) => {
            if !prefix.is_empty() {
                out.push((prefix.to_string(), Node::Scalar(value.clone())));
            }
        }
        Node::Object(fields) => {
            for (key, value) in fields {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}{}{}", prefix, SEPARATOR, key)
                };
                flatten_into(value, &path, out);
            }
        }
        Node::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_into(item, &format!("{}[{}]", prefix, index), out);
            }
        }
    }
}

/// Flattens a parsed document into table-friendly records.
///
/// A `Products` root holding `Product` entries becomes an array with one
/// flat object per entry, each carrying the root's attributes as
/// `Products.attributes.<name>`. An empty `Products` root becomes an empty
/// array. Any other document, including a `Products` root with content but
/// no `Product`, becomes one flat object.
pub fn flatten_document(document: &Node) -> Node {
    let products = match document.get(PRODUCTS_TAG) {
        Some(Node::Null) => return Node::Array(Vec::new()),
        Some(products) if products.get(PRODUCT_TAG).is_some() => products,
        _ => return Node::Object(flatten(document)),
    };

    let root_attributes: Vec<(String, Node)> = match products.get(ATTRIBUTES_KEY) {
        Some(Node::Object(attrs)) => attrs
            .iter()
            .map(|(name, value)| {
                (
                    format!("{}.{}.{}", PRODUCTS_TAG, ATTRIBUTES_KEY, name),
                    value.clone(),
                )
            })
            .collect(),
        _ => Vec::new(),
    };

    let rows = products
        .get(PRODUCT_TAG)
        .map(Node::entries)
        .unwrap_or_default()
        .into_iter()
        .map(|product| {
            let mut row = flatten(product);
            row.extend(root_attributes.iter().cloned());
            Node::Object(row)
        })
        .collect();

    Node::Array(rows)
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

fn parse_path(path: &str) -> Vec<Step> {
    let mut steps = Vec::new();

    for segment in path.split(SEPARATOR) {
        let (name, mut rest) = match segment.find('[') {
            Some(pos) => (&segment[..pos], &segment[pos..]),
            None => (segment, ""),
        };
        if !name.is_empty() {
            steps.push(Step::Key(name.to_string()));
        }

        while let Some(stripped) = rest.strip_prefix('[') {
            let Some(end) = stripped.find(']') else {
                break;
            };
            match stripped[..end].parse::<usize>() {
                Ok(index) => steps.push(Step::Index(index)),
                Err(_) => steps.push(Step::Key(format!("[{}]", &stripped[..end]))),
            }
            rest = &stripped[end + 1..];
        }
    }

    steps
}

fn insert(target: &mut Node, steps: &[Step], value: Node) {
    let Some((step, rest)) = steps.split_first() else {
        *target = value;
        return;
    };

    match step {
        Step::Key(key) => {
            if !matches!(target, Node::Object(_)) {
                *target = Node::Object(Vec::new());
            }
            if let Node::Object(fields) = target {
                let index = match fields.iter().position(|(k, _)| k == key) {
                    Some(index) => index,
                    None => {
                        fields.push((key.clone(), Node::Null));
                        fields.len() - 1
                    }
                };
                insert(&mut fields[index].1, rest, value);
            }
        }
        Step::Index(index) => {
            if !matches!(target, Node::Array(_)) {
                *target = Node::Array(Vec::new());
            }
            if let Node::Array(items) = target {
                if items.len() <= *index {
                    items.resize(*index + 1, Node::Null);
                }
                insert(&mut items[*index], rest, value);
            }
        }
    }
}

/// Rebuilds a nested node from flattened `(path, value)` pairs.
pub fn unflatten(pairs: &[(String, Node)]) -> Node {
    let mut root = Node::Null;
    for (path, value) in pairs {
        insert(&mut root, &parse_path(path), value.clone());
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::tree::parse_document;

    fn pairs(flat: &[(String, Node)]) -> Vec<(&str, &str)> {
        flat.iter()
            .map(|(k, v)| (k.as_str(), v.as_str().unwrap_or("<non-scalar>")))
            .collect()
    }

    #[test]
    fn test_flatten_joins_keys_and_indexes_arrays() {
        let doc = parse_document(
            br#"<Root><A id="7"><B>x</B><B>y</B></A><C>z</C></Root>"#,
        )
        .unwrap();

        let flat = flatten(&doc);
        assert_eq!(
            pairs(&flat),
            vec![
                ("Root.A.attributes.id", "7"),
                ("Root.A.B[0]", "x"),
                ("Root.A.B[1]", "y"),
                ("Root.C", "z"),
            ]
        );
    }

    #[test]
    fn test_flatten_indexes_arrays_of_objects() {
        let doc = parse_document(b"<R><P><N>a</N></P><P><N>b</N><N>c</N></P></R>").unwrap();

        let flat = flatten(&doc);
        assert_eq!(
            pairs(&flat),
            vec![("R.P[0].N", "a"), ("R.P[1].N[0]", "b"), ("R.P[1].N[1]", "c")]
        );
    }

    #[test]
    fn test_flatten_document_products() {
        let doc = parse_document(
            br#"<Products exportDate="2026-01-01">
                    <Product><Name>A</Name></Product>
                    <Product><Name>B</Name><Empty/></Product>
                </Products>"#,
        )
        .unwrap();

        let rows = flatten_document(&doc);
        let Node::Array(rows) = rows else {
            panic!("expected array of rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Name"), Some(&Node::scalar("A")));
        assert_eq!(
            rows[1].get("Products.attributes.exportDate"),
            Some(&Node::scalar("2026-01-01"))
        );
        assert!(rows[1].get("Empty").is_none());
    }

    #[test]
    fn test_flatten_document_empty_products_is_empty_array() {
        let doc = parse_document(b"<Products></Products>").unwrap();
        assert_eq!(flatten_document(&doc), Node::Array(vec![]));

        let doc = parse_document(b"<Products>\n  <Product/>\n</Products>").unwrap();
        assert_eq!(flatten_document(&doc), Node::Array(vec![]));
    }

    #[test]
    fn test_flatten_document_products_without_product_keeps_content() {
        let doc = parse_document(
            br#"<Products exportDate="2026"><Metadata><Source>HPRA</Source></Metadata></Products>"#,
        )
        .unwrap();
        assert_eq!(
            flatten_document(&doc),
            Node::Object(vec![
                ("Products.attributes.exportDate".to_string(), Node::scalar("2026")),
                ("Products.Metadata.Source".to_string(), Node::scalar("HPRA")),
            ])
        );

        let doc = parse_document(b"<Products>just text</Products>").unwrap();
        assert_eq!(
            flatten_document(&doc),
            Node::Object(vec![("Products".to_string(), Node::scalar("just text"))])
        );

        let doc = parse_document(br#"<Products version="2"/>"#).unwrap();
        assert_eq!(
            flatten_document(&doc),
            Node::Object(vec![("Products.attributes.version".to_string(), Node::scalar("2"))])
        );
    }

    #[test]
    fn test_flatten_document_other_root_is_single_object() {
        let doc = parse_document(b"<Catalogue><Entry>1</Entry></Catalogue>").unwrap();
        assert_eq!(
            flatten_document(&doc),
            Node::Object(vec![("Catalogue.Entry".to_string(), Node::scalar("1"))])
        );
    }

    #[test]
    fn test_round_trip_reconstructs_nested_document() {
        let doc = parse_document(
            br#"<Products source="hpra">
                    <Product id="1">
                        <Name>Aspirin</Name>
                        <Ingredient>Acetylsalicylic acid</Ingredient>
                        <Ingredient>Starch</Ingredient>
                        <Strength unit="mg">300</Strength>
                    </Product>
                    <Product id="2">
                        <Name>Ibuprofen</Name>
                        <Pack><Size>24</Size></Pack>
                        <Pack><Size>48</Size></Pack>
                    </Product>
                </Products>"#,
        )
        .unwrap();

        assert_eq!(unflatten(&flatten(&doc)), doc);
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("A.B[2].C"),
            vec![
                Step::Key("A".to_string()),
                Step::Key("B".to_string()),
                Step::Index(2),
                Step::Key("C".to_string()),
            ]
        );
        assert_eq!(parse_path("[0].x"), vec![Step::Index(0), Step::Key("x".to_string())]);
    }
}
