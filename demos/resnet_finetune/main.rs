//! # 迁移学习：部署网络 -> 微调用的训练/验证网络
//!
//! 展示网络编辑的完整流程：
//! - 三个数据层（训练、test-on-test、test-on-train）
//! - 追加一个50层的分类网络，并自动冻结全部卷积/BN/Scale层
//! - 删掉末尾的prob层，把分类头改成3类
//! - 补上损失层与准确率层，写出prototxt
//!
//! ## 运行
//! ```bash
//! cargo run --example resnet_finetune
//! ```

use caffe_net_editor::net::{Layer, NetStateRule, Phase};
use caffe_net_editor::proto::{Scalar, TextMessage};
use caffe_net_editor::{EditLayer, EditorError, NetEditor};
use std::path::PathBuf;

const NUM_CLASSES: u32 = 3;

fn data_layer(name: &str, rule: NetStateRule, source: &str, mirror: bool) -> Result<Layer, EditorError> {
    let mut transform_param = TextMessage::new();
    transform_param.push("mirror", mirror);
    transform_param.push("crop_size", 224u32);
    for mean in [104u32, 117, 123] {
        transform_param.push("mean_value", mean);
    }

    let mut data_param = TextMessage::new();
    data_param.push("source", source);
    data_param.push("batch_size", 32u32);
    data_param.push("backend", Scalar::Ident("LMDB".to_string()));

    Layer::new(name, "Data")
        .top("data")
        .top("label")
        .include(rule)
        .extra_message("transform_param", transform_param)?
        .extra_message("data_param", data_param)
}

fn main() -> Result<(), EditorError> {
    println!("=== 部署网络 -> 微调网络 ===\n");

    let classifier = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("classifier_50_deploy.prototxt");

    // 1. 数据层
    let mut editor = NetEditor::new("myResNet");
    editor.append_layer(data_layer("data1", NetStateRule::phase(Phase::Train), "train_lmdb", true)?)?;
    editor.append_layer(data_layer(
        "data2",
        NetStateRule::phase(Phase::Test).with_stage("test-on-test"),
        "test_lmdb",
        false,
    )?)?;
    editor.append_layer(data_layer(
        "data3",
        NetStateRule::phase(Phase::Test).with_stage("test-on-train"),
        "train_lmdb",
        false,
    )?)?;

    // 2. 分类网络（冻结）
    editor.append_net_file(&classifier, true)?;
    println!("载入分类网络后共{}层", editor.len());

    // 3. 换分类头
    editor.remove_last(None)?;
    editor.edit_layer(EditLayer::new("fc1000").rename("fc3").num_output(NUM_CLASSES))?;

    // 4. 损失与准确率
    editor.append_layer(
        Layer::new("loss", "SoftmaxWithLoss")
            .bottom("fc3")
            .bottom("label")
            .top("loss"),
    )?;
    editor.append_layer(
        Layer::new("accuracy", "Accuracy")
            .bottom("fc3")
            .bottom("label")
            .top("accuracy")
            .include(NetStateRule::phase(Phase::Test)),
    )?;

    editor.summary();

    let output = std::env::temp_dir().join("myResNet-train-val.prototxt");
    editor.save(&output)?;
    println!("\n已写出: {}", output.display());
    Ok(())
}
