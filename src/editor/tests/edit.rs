use super::{backbone, editor_with};
use crate::assert_err;
use crate::editor::{EditLayer, NetEditor};
use crate::errors::EditorError;
use crate::net::{Layer, ParamSpec};
use approx::assert_relative_eq;

#[test]
fn test_rename_and_num_output() {
    let mut editor = editor_with(backbone());
    editor
        .edit_layer(EditLayer::new("fc").rename("fc3").num_output(3))
        .unwrap();

    let fc3 = editor.layer("fc3").unwrap();
    assert_eq!(fc3.top, vec!["fc3"]);
    assert_eq!(fc3.num_output(), Some(3));
    // 下游层的输入端口不跟着改
    assert_eq!(fc3.bottom, vec!["pool1"]);
    assert_err!(editor.layer("fc"), EditorError::UnknownLayer("fc"));
    assert_eq!(editor.layer_names().last().map(String::as_str), Some("fc3"));
}

#[test]
fn test_rename_to_existing_name_fails() {
    let mut editor = editor_with(backbone());
    assert_err!(
        editor.edit_layer(EditLayer::new("fc").rename("conv1")),
        EditorError::DuplicateLayerName("conv1")
    );
    assert!(editor.layer("fc").is_ok());

    // 改成自己的名字不算重名
    editor.edit_layer(EditLayer::new("fc").rename("fc")).unwrap();
}

#[test]
fn test_edit_before_initialized() {
    let mut editor = NetEditor::new("net1");
    assert_err!(
        editor.edit_layer(EditLayer::new("fc").num_output(3)),
        EditorError::NotInitialized
    );
}

#[test]
fn test_edit_unknown_layer() {
    let mut editor = editor_with(backbone());
    assert_err!(
        editor.edit_layer(EditLayer::new("fc8").num_output(3)),
        EditorError::UnknownLayer("fc8")
    );
}

#[test]
fn test_update_multipliers_in_place() {
    let mut editor = editor_with(backbone());
    editor
        .edit_layer(EditLayer::new("fc").lr_mult([10.0, 20.0]))
        .unwrap();

    let param = &editor.layer("fc").unwrap().param;
    assert_eq!(param.len(), 2);
    assert_relative_eq!(param[0].lr_mult.unwrap(), 10.0);
    assert_relative_eq!(param[1].lr_mult.unwrap(), 20.0);
    // 没给出的decay_mult保持不变
    assert_relative_eq!(param[0].decay_mult.unwrap(), 1.0);
    assert_relative_eq!(param[1].decay_mult.unwrap(), 0.0);
}

#[test]
fn test_mismatched_multipliers_replace_list() {
    let mut editor = editor_with(backbone());
    editor
        .edit_layer(EditLayer::new("fc").lr_mult([0.5]).decay_mult([0.25]))
        .unwrap();
    assert_eq!(editor.layer("fc").unwrap().param, vec![ParamSpec::new(0.5, 0.25)]);

    editor
        .edit_layer(
            EditLayer::new("conv1")
                .lr_mult([1.0, 2.0, 3.0])
                .decay_mult([1.0, 0.0, 0.0]),
        )
        .unwrap();
    assert_eq!(
        editor.layer("conv1").unwrap().param,
        vec![
            ParamSpec::new(1.0, 1.0),
            ParamSpec::new(2.0, 0.0),
            ParamSpec::new(3.0, 0.0),
        ]
    );
}

#[test]
fn test_invalid_multipliers_leave_layer_untouched() {
    let mut editor = editor_with(backbone());

    assert_err!(
        editor.edit_layer(EditLayer::new("fc").lr_mult([1.0, 2.0]).decay_mult([1.0])),
        EditorError::InvalidArgument(_)
    );
    // 数量不一致又只给出一种乘子时无法成对重建
    assert_err!(
        editor.edit_layer(EditLayer::new("fc").rename("fc3").lr_mult([0.0])),
        EditorError::InvalidArgument(msg) if msg.contains("fc")
    );

    let fc = editor.layer("fc").unwrap();
    assert_eq!(fc.param, vec![ParamSpec::new(1.0, 1.0), ParamSpec::new(2.0, 0.0)]);
}

#[test]
fn test_num_output_on_non_inner_product() {
    let mut editor = editor_with(backbone());
    editor
        .edit_layer(EditLayer::new("pool1").num_output(16))
        .unwrap();
    let pool = editor.layer("pool1").unwrap();
    assert_eq!(pool.num_output(), Some(16));
    assert!(pool.extra.get_message("inner_product_param").is_some());
}

#[test]
fn test_use_global_stats() {
    let mut editor = editor_with(backbone());
    editor
        .edit_layer(EditLayer::new("bn1").use_global_stats(true))
        .unwrap();
    assert_eq!(editor.layer("bn1").unwrap().use_global_stats(), Some(true));

    // 非BatchNorm层忽略该项，但同一条命令里的其它修改照常生效
    editor
        .edit_layer(EditLayer::new("relu1").rename("relu_a").use_global_stats(true))
        .unwrap();
    let relu = editor.layer("relu_a").unwrap();
    assert_eq!(relu.use_global_stats(), None);
    assert_eq!(relu, &Layer::new("relu_a", "ReLU").bottom("conv1").top("relu_a"));
}
