use std::path::Path;

use kintree::{
    CanonicalNode, FamilyChart, LayoutConfig, Theme, compute_layout, normalize,
};

fn load_fixture(name: &str) -> serde_json::Value {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    let input = std::fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("fixture {name} read failed: {err}"));
    serde_json::from_str(&input).unwrap_or_else(|err| panic!("fixture {name} parse failed: {err}"))
}

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(svg.contains("viewBox="), "{fixture}: not fitted");
}

fn render_fixture(name: &str) -> String {
    let tree = load_fixture(name);
    let mut chart = FamilyChart::from_value(&tree, LayoutConfig::default(), Theme::classic())
        .unwrap_or_else(|err| panic!("fixture {name} rejected: {err}"));
    chart.draw_svg()
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new input shapes must be added intentionally.
    let fixtures = [
        "lone.json",
        "couple.json",
        "three_generations.json",
        "multi_spouse.json",
        "single_child.json",
        "bare_person.json",
        "odd_shapes.json",
    ];

    for fixture in fixtures {
        let svg = render_fixture(fixture);
        assert_valid_svg(&svg, fixture);
    }
}

#[test]
fn fixtures_render_person_names() {
    let svg = render_fixture("three_generations.json");
    for name in ["Harold Ried", "Edith Ried", "Arthur Ried", "Susan Ried"] {
        assert!(svg.contains(name), "missing label {name}");
    }
}

#[test]
fn malformed_fixture_degrades_instead_of_failing() {
    let svg = render_fixture("odd_shapes.json");
    assert!(svg.contains("Deep"));
    // The id-less child gets no box, but the render completes.
    assert!(!svg.contains("No Id Here"));
}

#[test]
fn sibling_subtrees_never_overlap_in_any_fixture() {
    let fixtures = [
        "three_generations.json",
        "multi_spouse.json",
        "bare_person.json",
        "odd_shapes.json",
    ];
    let config = LayoutConfig::default();
    for fixture in fixtures {
        let tree = load_fixture(fixture);
        let mut root = normalize(&tree).expect("fixture normalizes");
        compute_layout(&mut root, 0, 0.0, &config);
        walk_no_overlap(&root, &config, fixture);
    }
}

fn walk_no_overlap(node: &CanonicalNode, config: &LayoutConfig, fixture: &str) {
    for pair in node.children.windows(2) {
        let (Some(left), Some(right)) = (pair[0].layout, pair[1].layout) else {
            continue;
        };
        let left_end = left.center_x + left.subtree_width / 2.0;
        let right_start = right.center_x - right.subtree_width / 2.0;
        assert!(
            left_end + config.h_spacing <= right_start + 1e-3,
            "{fixture}: sibling overlap ({left_end} vs {right_start})"
        );
    }
    for child in &node.children {
        walk_no_overlap(child, config, fixture);
    }
}

#[test]
fn focus_highlight_changes_exactly_one_box_style() {
    let tree = load_fixture("three_generations.json");
    let mut chart =
        FamilyChart::from_value(&tree, LayoutConfig::default(), Theme::classic()).unwrap();
    chart.highlight_node("3");
    let svg = chart.draw_svg();
    let theme = Theme::classic();
    let selected_boxes = svg.matches(&format!("fill=\"{}\"", theme.selected_fill)).count();
    assert_eq!(selected_boxes, 1);
}

#[test]
fn single_child_sits_under_parent_connector() {
    let tree = load_fixture("single_child.json");
    let mut chart =
        FamilyChart::from_value(&tree, LayoutConfig::default(), Theme::classic()).unwrap();
    let _ = chart.draw_svg();
    let root = chart.root();
    let root_layout = root.layout.unwrap();
    let child_layout = root.children[0].layout.unwrap();
    // The marriage descent hangs at the couple block's midpoint, which is the
    // subtree center; the spouseless child's own box must land exactly there.
    assert_eq!(child_layout.center_x, root_layout.center_x);
    assert_eq!(child_layout.person_center_x, root_layout.center_x);
}
