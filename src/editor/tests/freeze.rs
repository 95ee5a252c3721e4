use super::{backbone, data_layers, editor_with};
use crate::assert_err;
use crate::editor::NetEditor;
use crate::errors::EditorError;
use crate::net::{ConvolutionParam, Layer, LayerParams, NetParameter, ParamSpec};
use crate::proto::TextMessage;

#[test]
fn test_freeze_before_initialized() {
    let mut editor = NetEditor::new("net1");
    assert_err!(editor.freeze_all(), EditorError::NotInitialized);
}

#[test]
fn test_freeze_learnable_layers() {
    let mut layers = data_layers();
    layers.extend(backbone());
    layers.push(
        Layer::new("conv_nobias", "Convolution")
            .bottom("fc")
            .top("conv_nobias")
            .with_params(LayerParams::Convolution(ConvolutionParam {
                bias_term: Some(false),
                ..ConvolutionParam::default()
            })),
    );
    let mut editor = editor_with(layers);
    editor.freeze_all().unwrap();

    let zero = ParamSpec::new(0.0, 0.0);
    assert_eq!(editor.layer("conv1").unwrap().param, vec![zero.clone(), zero.clone()]);
    assert_eq!(editor.layer("conv_nobias").unwrap().param, vec![zero.clone()]);
    assert_eq!(editor.layer("scale1").unwrap().param, vec![zero]);
    assert_eq!(
        editor.layer("bn1").unwrap().param,
        vec![ParamSpec::lr_only(0.0); 3]
    );
    // 其它类型不受影响
    assert!(editor.layer("relu1").unwrap().param.is_empty());
    assert!(editor.layer("data_train").unwrap().param.is_empty());
    assert_eq!(editor.layer("fc").unwrap().param.len(), 2);
}

#[test]
fn test_freeze_keeps_existing_multipliers() {
    let mut layers = backbone();
    layers[0].param.push(ParamSpec::new(1.0, 1.0));
    let mut editor = editor_with(layers);
    editor.freeze_all().unwrap();

    assert_eq!(editor.layer("conv1").unwrap().param, vec![ParamSpec::new(1.0, 1.0)]);
}

#[test]
fn test_freeze_twice() {
    let mut editor = editor_with(backbone());
    editor.freeze_all().unwrap();
    let conv_once = editor.layer("conv1").unwrap().param.clone();
    let scale_once = editor.layer("scale1").unwrap().param.clone();

    editor.freeze_all().unwrap();
    assert_eq!(editor.layer("conv1").unwrap().param, conv_once);
    assert_eq!(editor.layer("scale1").unwrap().param, scale_once);
    // BatchNorm每次都追加三组
    let bn = &editor.layer("bn1").unwrap().param;
    assert_eq!(bn.len(), 6);
    assert!(bn.iter().all(ParamSpec::is_frozen));
}

#[test]
fn test_freeze_built_layer_with_param_block() {
    let mut conv_param = TextMessage::new();
    conv_param.push("num_output", 16u32);
    conv_param.push("bias_term", false);
    conv_param.push("kernel_size", 3u32);
    let conv = Layer::new("conv", "Convolution")
        .bottom("data")
        .top("conv")
        .extra_message("convolution_param", conv_param)
        .unwrap();

    let mut editor = editor_with(vec![conv]);
    editor.freeze_all().unwrap();
    assert_eq!(editor.layer("conv").unwrap().param, vec![ParamSpec::new(0.0, 0.0)]);

    let reloaded = NetParameter::from_text(&editor.to_text()).unwrap();
    assert_eq!(&reloaded, editor.show());
}
