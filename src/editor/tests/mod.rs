mod edit;
mod freeze;

use crate::editor::NetEditor;
use crate::net::{Layer, NetStateRule, ParamSpec, Phase};

/// 三个数据层（训练、test-on-test、test-on-train），每个都声明`data`和`label`两个输出
fn data_layers() -> Vec<Layer> {
    [
        ("data_train", NetStateRule::phase(Phase::Train)),
        ("data_test", NetStateRule::phase(Phase::Test).with_stage("test-on-test")),
        ("data_tot", NetStateRule::phase(Phase::Test).with_stage("test-on-train")),
    ]
    .into_iter()
    .map(|(name, rule)| Layer::new(name, "Data").top("data").top("label").include(rule))
    .collect()
}

/// conv1 -> bn1 -> scale1 -> relu1 -> pool1 -> fc
fn backbone() -> Vec<Layer> {
    vec![
        Layer::new("conv1", "Convolution").bottom("data").top("conv1"),
        Layer::new("bn1", "BatchNorm").bottom("conv1").top("conv1"),
        Layer::new("scale1", "Scale").bottom("conv1").top("conv1"),
        Layer::new("relu1", "ReLU").bottom("conv1").top("conv1"),
        Layer::new("pool1", "Pooling").bottom("conv1").top("pool1"),
        Layer::new("fc", "InnerProduct")
            .bottom("pool1")
            .top("fc")
            .param(ParamSpec::new(1.0, 1.0))
            .param(ParamSpec::new(2.0, 0.0)),
    ]
}

fn loss_layers() -> Vec<Layer> {
    vec![
        Layer::new("loss", "SoftmaxWithLoss")
            .bottom("fc")
            .bottom("label")
            .top("loss"),
        Layer::new("accuracy", "Accuracy")
            .bottom("fc")
            .bottom("label")
            .top("accuracy")
            .include(NetStateRule::phase(Phase::Test)),
    ]
}

fn editor_with(layers: Vec<Layer>) -> NetEditor {
    let mut editor = NetEditor::new("net1");
    for layer in layers {
        editor.append_layer(layer).unwrap();
    }
    editor
}

fn names(editor: &NetEditor) -> Vec<&str> {
    editor.layer_names().iter().map(String::as_str).collect()
}
