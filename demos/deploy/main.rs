//! # 训练网络 -> 部署网络
//!
//! 读入一个训练/验证网络，删掉数据、损失、准确率层，补上prob层并声明输入形状。
//!
//! ## 运行
//! ```bash
//! # 使用默认配置（输入 1x3x224x224）
//! cargo run --example deploy -- path/to/train_val.prototxt
//! # 指定部署配置
//! cargo run --example deploy -- path/to/train_val.prototxt demos/deploy/deploy.json
//! ```

use caffe_net_editor::net::NetParameter;
use caffe_net_editor::{DeployOptions, EditorError, NetEditor};
use std::env;

fn main() -> Result<(), EditorError> {
    let args: Vec<String> = env::args().skip(1).collect();
    let Some(input) = args.first() else {
        eprintln!("用法: deploy <train_val.prototxt> [deploy.json]");
        return Ok(());
    };
    let options = match args.get(1) {
        Some(path) => DeployOptions::from_json_file(path)?,
        None => DeployOptions::default(),
    };

    let mut editor = NetEditor::from_net(NetParameter::open(input)?)?;
    println!("=== {}（{}层）===", editor.name(), editor.len());

    editor.deploy_with(&options)?;
    editor.summary();

    editor.serialize(&mut std::io::stdout().lock())?;
    Ok(())
}
