//! # Caffe Net Editor
//!
//! `caffe_net_editor`用于编辑caffe的网络描述文件（prototxt）：载入已有网络、
//! 在末尾追加/删除层、修改层参数、冻结可学习层、把训练网络转换为部署网络，最后写回文本。
//! 不涉及任何数值计算。
//!
//! - [`proto`]: protobuf文本格式的读写
//! - [`net`]: 网络与层的强类型模型
//! - [`editor`]: 网络编辑器及各编辑命令
//!

pub mod editor;
pub mod errors;
pub mod net;
pub mod proto;
pub mod utils;

pub use editor::{DeployOptions, EditLayer, NetEditor};
pub use errors::EditorError;
pub use net::{Layer, NetParameter, NetStateRule, ParamSpec, Phase};
