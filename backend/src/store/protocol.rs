use crate::utils::rpc::StoreCommand;
use eventdesk_shared::{EventDocument, OperatorDocument, Session, StoredEvent};
use serde::{Deserialize, Serialize};

// =========================================================
// DocumentStore 指令定义
// =========================================================

/// 读取 `eventos` 集合的全部文档
#[derive(Serialize, Deserialize)]
pub struct ListEventsCmd;

impl StoreCommand for ListEventsCmd {
    type Response = Vec<StoredEvent>;
    const PATH: &'static str = "/eventos/list";
}

#[derive(Serialize, Deserialize)]
pub struct GetEventCmd {
    pub id: String,
}

impl StoreCommand for GetEventCmd {
    type Response = Option<EventDocument>;
    const PATH: &'static str = "/eventos/get";
}

/// 按 id 写入（新建或整体覆盖）
#[derive(Serialize, Deserialize)]
pub struct PutEventCmd {
    pub id: String,
    pub document: EventDocument,
}

impl StoreCommand for PutEventCmd {
    type Response = ();
    const PATH: &'static str = "/eventos/put";
}

#[derive(Serialize, Deserialize)]
pub struct DeleteEventCmd {
    pub id: String,
}

impl StoreCommand for DeleteEventCmd {
    type Response = bool;
    const PATH: &'static str = "/eventos/delete";
}

/// 读取 `usuarios` 集合；集合为空时先写入 seed 中的名称
#[derive(Serialize, Deserialize)]
pub struct ListOperatorsCmd {
    #[serde(default)]
    pub seed: Vec<String>,
}

impl StoreCommand for ListOperatorsCmd {
    type Response = Vec<OperatorDocument>;
    const PATH: &'static str = "/usuarios/list";
}

// =========================================================
// 会话
// =========================================================

#[derive(Serialize, Deserialize)]
pub struct PutSessionCmd {
    pub session: Session,
}

impl StoreCommand for PutSessionCmd {
    type Response = ();
    const PATH: &'static str = "/sesion/put";
}

#[derive(Serialize, Deserialize)]
pub struct GetSessionCmd {
    pub token: String,
}

impl StoreCommand for GetSessionCmd {
    type Response = Option<Session>;
    const PATH: &'static str = "/sesion/get";
}

#[derive(Serialize, Deserialize)]
pub struct DeleteSessionCmd {
    pub token: String,
}

impl StoreCommand for DeleteSessionCmd {
    type Response = bool;
    const PATH: &'static str = "/sesion/delete";
}
