/*
 * @Author       : 老董
 * @Date         : 2026-02-05
 * @Description  : 编辑命令：每种编辑操作对应一个命令对象，作用于网络本身
 *
 * 命令只负责修改`NetParameter`，层名称/类型索引由`NetEditor`在每条命令之后统一重建
 */

mod append;
mod deploy;
mod edit;
mod freeze;
mod remove;

pub use append::{AppendLayer, AppendNet};
pub use deploy::Deploy;
pub use edit::EditLayer;
pub use freeze::FreezeAll;
pub use remove::RemoveLast;

use super::index::LayerIndex;
use crate::errors::EditorError;
use crate::net::NetParameter;
use enum_dispatch::enum_dispatch;

#[enum_dispatch]
#[derive(Debug, Clone)]
pub enum EditCommand {
    AppendLayer,
    AppendNet,
    RemoveLast,
    EditLayer,
    FreezeAll,
    Deploy,
}

#[enum_dispatch(EditCommand)]
pub trait NetCommand {
    /// 命令名（用于日志）
    fn name(&self) -> &'static str;

    /// 作用于网络。`index`为执行前的索引，None表示编辑器尚未载入过任何层
    fn apply(&self, net: &mut NetParameter, index: Option<&LayerIndex>) -> Result<(), EditorError>;
}
