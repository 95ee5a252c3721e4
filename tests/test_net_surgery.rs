/*
 * @Author       : 老董
 * @Date         : 2026-02-07
 * @Description  : 对载入的网络做局部修改：截断、调整乘子、部署
 */
use caffe_net_editor::errors::EditorError;
use caffe_net_editor::net::{NetParameter, ParamSpec};
use caffe_net_editor::{DeployOptions, EditLayer, NetEditor};

const CLASSIFIER: &str = "tests/data/classifier_50_deploy.prototxt";

fn classifier() -> Result<NetEditor, EditorError> {
    NetEditor::from_net(NetParameter::open(CLASSIFIER)?)
}

#[test]
fn test_open_classifier() -> Result<(), EditorError> {
    let editor = classifier()?;
    assert!(editor.is_initialized());
    assert_eq!(editor.name(), "Classifier-50");
    assert_eq!(editor.len(), 50);
    assert_eq!(editor.layer_names().last().map(String::as_str), Some("prob"));
    assert_eq!(editor.show().input_dim, vec![1, 3, 224, 224]);

    // 载入后原样写出
    let text = std::fs::read_to_string(CLASSIFIER)?;
    assert_eq!(editor.to_text(), text);
    Ok(())
}

#[test]
fn test_truncate_after_conv_block() -> Result<(), EditorError> {
    let mut editor = classifier()?;
    editor.remove_last(Some("conv1_relu"))?;

    let names: Vec<&str> = editor.layer_names().iter().map(String::as_str).collect();
    assert_eq!(names, ["conv1", "bn_conv1", "scale_conv1", "conv1_relu"]);
    Ok(())
}

#[test]
fn test_reset_multipliers_of_classifier_head() -> Result<(), EditorError> {
    let mut editor = classifier()?;
    editor.freeze_all()?;
    editor.edit_layer(EditLayer::new("fc1000").lr_mult([10.0, 20.0]).decay_mult([1.0, 0.0]))?;
    editor.edit_layer(
        EditLayer::new("conv1")
            .lr_mult([0.1, 0.2])
            .decay_mult([1.0, 0.0]),
    )?;

    assert_eq!(
        editor.layer("fc1000")?.param,
        vec![ParamSpec::new(10.0, 1.0), ParamSpec::new(20.0, 0.0)]
    );
    // 冻结时只补了一组，数量不一致，整体替换
    assert_eq!(
        editor.layer("conv1")?.param,
        vec![ParamSpec::new(0.1, 1.0), ParamSpec::new(0.2, 0.0)]
    );
    Ok(())
}

#[test]
fn test_deploy_requires_classifier_head() -> Result<(), EditorError> {
    // prob本身就是Softmax，不在删除列表里
    let mut editor = classifier()?;
    let err = editor.deploy(&[1, 3, 224, 224]).unwrap_err();
    assert!(matches!(err, EditorError::AssertionViolation(_)), "{err}");

    editor.remove_last(None)?;
    let options = DeployOptions::default().with_input_shape(&[4, 3, 256, 256]);
    editor.deploy_with(&options)?;
    assert_eq!(editor.len(), 50);
    // 原网络已声明过输入，部署后追加一组
    assert_eq!(editor.show().input, vec!["data", "data"]);
    assert_eq!(editor.show().input_dim[4..], [4, 3, 256, 256]);
    Ok(())
}

#[test]
fn test_legacy_net_is_rejected() {
    let legacy = NetParameter::from_text(
        r#"
        name: "LeNet"
        layers { name: "conv1" type: CONVOLUTION bottom: "data" top: "conv1" }
        layers { name: "ip1" type: INNER_PRODUCT bottom: "conv1" top: "ip1" }
        "#,
    )
    .expect("旧版网络也能解析");

    let mut editor = NetEditor::new("net1");
    let err = editor.append_net(legacy, true).unwrap_err();
    assert!(matches!(err, EditorError::LegacyFormat));
    assert!(!editor.is_initialized());
}
