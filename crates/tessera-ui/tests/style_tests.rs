//! Style property dispatch tests.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tessera_core::{HAlign, Size, VAlign};
use tessera_render::{Color, RenderError};
use tessera_test_utils::{DeviceCall, FixedFont, RecordingRenderDevice};
use tessera_ui::style::ParseConverter;
use tessera_ui::{
    Behavior, DirtyFlags, Label, NodeId, NodeSetup, NodeTree, Renderer, RendererConfig, StyleError,
    StyleRegistry, UiError,
};

/// Records every value its setter receives.
struct Probe {
    received: Rc<RefCell<Vec<i32>>>,
}

impl Behavior for Probe {
    fn init(&mut self, _node: &mut NodeSetup<'_>) {}

    fn type_name(&self) -> &'static str {
        "Probe"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn device() -> RecordingRenderDevice {
    RecordingRenderDevice::new(200, 100).with_font("ui.fnt", FixedFont::new(10, 10))
}

fn label_tree(label: Label) -> (NodeTree, NodeId) {
    let mut tree = NodeTree::new();
    let root = tree.create_node().unwrap();
    tree.set_fixed_size(root, Size::new(200, 100)).unwrap();
    tree.set_root(root).unwrap();
    let id = tree.create_with(label).unwrap();
    tree.add_child(root, id).unwrap();
    (tree, id)
}

fn render_clean(tree: &mut NodeTree) {
    Renderer::new(RendererConfig::default())
        .render(tree, &mut device())
        .unwrap();
}

fn label(tree: &NodeTree, id: NodeId) -> &Label {
    tree.get(id).unwrap().behavior::<Label>().unwrap()
}

#[test]
fn test_text_color_sets_white() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(
        Label::new("Hi")
            .with_font(Arc::new(FixedFont::new(10, 10)))
            .with_color(Color::RED),
    );
    render_clean(&mut tree);

    registry
        .apply(&mut tree, id, "text-color", "#FFFFFF", &mut device())
        .unwrap();

    assert_eq!(label(&tree, id).color(), Color::WHITE);
    assert_eq!(tree.get(id).unwrap().dirty_flags(), DirtyFlags::REDRAW);
}

#[test]
fn test_unknown_property_is_rejected() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(Label::new("Hi").with_color(Color::RED));

    let err = registry
        .apply(&mut tree, id, "bogus-prop", "#FFFFFF", &mut device())
        .unwrap_err();

    assert_eq!(
        err,
        UiError::Style(StyleError::UnknownProperty {
            property: "bogus-prop".to_string(),
            target: "Label",
        })
    );
    assert_eq!(label(&tree, id).color(), Color::RED);
}

#[test]
fn test_setter_runs_only_after_successful_conversion() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut registry = StyleRegistry::new();
    registry.register::<Probe, _>("value", ParseConverter::<i32>::new(), |probe, value| {
        probe.received.borrow_mut().push(value)
    });

    let mut tree = NodeTree::new();
    let id = tree
        .create_with(Probe {
            received: received.clone(),
        })
        .unwrap();
    let mut device = device();

    let unknown = registry.apply(&mut tree, id, "bogus-prop", "1", &mut device);
    assert!(matches!(
        unknown,
        Err(UiError::Style(StyleError::UnknownProperty { .. }))
    ));

    let invalid = registry.apply(&mut tree, id, "value", "three", &mut device);
    match invalid {
        Err(UiError::Style(StyleError::Conversion { property, value, .. })) => {
            assert_eq!(property, "value");
            assert_eq!(value, "three");
        }
        other => panic!("expected a conversion error, got {other:?}"),
    }
    assert!(received.borrow().is_empty());

    registry.apply(&mut tree, id, "value", "3", &mut device).unwrap();
    assert_eq!(*received.borrow(), vec![3]);
}

#[test]
fn test_properties_are_scoped_to_behavior_type() {
    let registry = StyleRegistry::with_builtin();
    let mut tree = NodeTree::new();
    let id = tree
        .create_with(Probe {
            received: Rc::default(),
        })
        .unwrap();

    let err = registry
        .apply(&mut tree, id, "text-color", "#FFFFFF", &mut device())
        .unwrap_err();
    assert!(matches!(
        err,
        UiError::Style(StyleError::UnknownProperty { target: "Probe", .. })
    ));
}

#[test]
fn test_text_property_requests_layout() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(Label::new("Hi").with_font(Arc::new(FixedFont::new(10, 10))));
    render_clean(&mut tree);

    registry
        .apply(&mut tree, id, "text", "Hello", &mut device())
        .unwrap();

    assert_eq!(label(&tree, id).text(), "Hello");
    assert!(tree.get(id).unwrap().dirty_flags().needs_layout());
    assert_eq!(tree.get(id).unwrap().min_size(), Ok(Size::new(50, 10)));
}

#[test]
fn test_font_property_loads_through_device() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(Label::new("Hi"));
    let mut device = device();
    let log = device.log();

    registry
        .apply(&mut tree, id, "font", "ui.fnt", &mut device)
        .unwrap();

    assert_eq!(label(&tree, id).text_width(), Ok(20));
    assert_eq!(
        log.calls(),
        vec![DeviceCall::CreateFont {
            path: "ui.fnt".to_string()
        }]
    );
}

#[test]
fn test_missing_font_is_resource_error() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(Label::new("Hi"));

    let err = registry
        .apply(&mut tree, id, "font", "missing.fnt", &mut device())
        .unwrap_err();

    match err {
        UiError::Style(StyleError::Resource(render)) => assert!(render.is_resource()),
        other => panic!("expected a resource error, got {other:?}"),
    }
    assert!(label(&tree, id).font().is_none());
}

#[test]
fn test_alignment_properties() {
    let registry = StyleRegistry::with_builtin();
    let (mut tree, id) = label_tree(Label::new("Hi"));
    let mut device = device();

    registry
        .apply_all(
            &mut tree,
            id,
            [("text-halign", "right"), ("text-valign", "top")],
            &mut device,
        )
        .unwrap();

    assert_eq!(label(&tree, id).halign(), HAlign::Right);
    assert_eq!(label(&tree, id).valign(), VAlign::Top);

    let err = registry
        .apply(&mut tree, id, "text-halign", "middle", &mut device)
        .unwrap_err();
    assert!(matches!(err, UiError::Style(StyleError::Conversion { .. })));
}

#[test]
fn test_node_without_behavior() {
    let registry = StyleRegistry::with_builtin();
    let mut tree = NodeTree::new();
    let id = tree.create_node().unwrap();

    let err = registry
        .apply(&mut tree, id, "text", "Hi", &mut device())
        .unwrap_err();
    assert_eq!(
        err,
        UiError::Style(StyleError::NoBehavior {
            property: "text".to_string()
        })
    );
}

#[test]
fn test_unknown_node() {
    let registry = StyleRegistry::with_builtin();
    let mut tree = NodeTree::new();
    let err = registry
        .apply(&mut tree, NodeId(7), "text", "Hi", &mut device())
        .unwrap_err();
    assert_eq!(err, UiError::NodeNotFound(NodeId(7)));
}

#[test]
fn test_resource_errors_convert() {
    let err: StyleError = RenderError::resource("a.fnt", "gone").into();
    assert!(matches!(err, StyleError::Resource(_)));
}
