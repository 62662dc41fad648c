pub mod adapter;
pub mod protocol;

use crate::error::DeskResult;
use crate::utils::rpc::{StoreCommand, StoreHandler};
use adapter::{StorageAdapter, WorkerStorage};
use eventdesk_shared::{
    COLLECTION_EVENTS, COLLECTION_OPERATORS, EventDocument, OperatorDocument, Session, StoredEvent,
};
use protocol::*;
use worker::*;

/// 会话集合
pub(crate) const COLLECTION_SESSIONS: &str = "sesion";

fn collection_prefix(collection: &str) -> String {
    format!("{}:", collection)
}

fn document_key(collection: &str, id: &str) -> String {
    format!("{}:{}", collection, id)
}

// =========================================================
// 业务逻辑层 (可测试)
// =========================================================

/// 单个 Durable Object 内的文档集合
///
/// key 形如 `<集合>:<id>`，每个集合都可以按前缀整体列出
pub struct DocumentStoreLogic<S: StorageAdapter> {
    storage: S,
}

impl<S: StorageAdapter> DocumentStoreLogic<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub async fn list_events(&self, _cmd: ListEventsCmd) -> DeskResult<Vec<StoredEvent>> {
        let entries = self
            .storage
            .list_prefix::<EventDocument>(&collection_prefix(COLLECTION_EVENTS))
            .await?;
        Ok(entries
            .into_iter()
            .map(|(id, document)| StoredEvent { id, document })
            .collect())
    }

    pub async fn get_event(&self, cmd: GetEventCmd) -> DeskResult<Option<EventDocument>> {
        self.storage
            .get(&document_key(COLLECTION_EVENTS, &cmd.id))
            .await
    }

    pub async fn put_event(&self, cmd: PutEventCmd) -> DeskResult<()> {
        self.storage
            .put(&document_key(COLLECTION_EVENTS, &cmd.id), &cmd.document)
            .await
    }

    pub async fn delete_event(&self, cmd: DeleteEventCmd) -> DeskResult<bool> {
        self.storage
            .delete(&document_key(COLLECTION_EVENTS, &cmd.id))
            .await
    }

    pub async fn list_operators(&self, cmd: ListOperatorsCmd) -> DeskResult<Vec<OperatorDocument>> {
        let prefix = collection_prefix(COLLECTION_OPERATORS);
        let existing = self.storage.list_prefix::<OperatorDocument>(&prefix).await?;
        if !existing.is_empty() || cmd.seed.is_empty() {
            return Ok(existing.into_iter().map(|(_, doc)| doc).collect());
        }

        let seeded: Vec<(String, OperatorDocument)> = cmd
            .seed
            .into_iter()
            .map(|name| {
                let id = uuid::Uuid::new_v4().simple().to_string();
                (id, OperatorDocument { nombre: Some(name) })
            })
            .collect();

        let writes = seeded.iter().map(|(id, doc)| async move {
            self.storage
                .put(&document_key(COLLECTION_OPERATORS, id), doc)
                .await
        });
        for result in futures::future::join_all(writes).await {
            result.map_err(|e| e.in_op("operators.seed"))?;
        }
        Ok(seeded.into_iter().map(|(_, doc)| doc).collect())
    }

    pub async fn put_session(&self, cmd: PutSessionCmd) -> DeskResult<()> {
        self.storage
            .put(
                &document_key(COLLECTION_SESSIONS, &cmd.session.token),
                &cmd.session,
            )
            .await
    }

    pub async fn get_session(&self, cmd: GetSessionCmd) -> DeskResult<Option<Session>> {
        self.storage
            .get(&document_key(COLLECTION_SESSIONS, &cmd.token))
            .await
    }

    pub async fn delete_session(&self, cmd: DeleteSessionCmd) -> DeskResult<bool> {
        self.storage
            .delete(&document_key(COLLECTION_SESSIONS, &cmd.token))
            .await
    }
}

// =========================================================
// Durable Object 绑定层 (Worker)
// =========================================================

#[durable_object]
pub struct DocumentStore {
    state: State,
    _env: Env,
}

impl DurableObject for DocumentStore {
    fn new(state: State, env: Env) -> Self {
        Self { state, _env: env }
    }

    async fn fetch(&self, req: Request) -> Result<Response> {
        let logic = DocumentStoreLogic::new(WorkerStorage(self.state.storage()));
        let path = req.path();

        match path.as_str() {
            ListEventsCmd::PATH => StoreHandler::handle(req, |c| logic.list_events(c)).await,
            GetEventCmd::PATH => StoreHandler::handle(req, |c| logic.get_event(c)).await,
            PutEventCmd::PATH => StoreHandler::handle(req, |c| logic.put_event(c)).await,
            DeleteEventCmd::PATH => StoreHandler::handle(req, |c| logic.delete_event(c)).await,
            ListOperatorsCmd::PATH => StoreHandler::handle(req, |c| logic.list_operators(c)).await,
            PutSessionCmd::PATH => StoreHandler::handle(req, |c| logic.put_session(c)).await,
            GetSessionCmd::PATH => StoreHandler::handle(req, |c| logic.get_session(c)).await,
            DeleteSessionCmd::PATH => StoreHandler::handle(req, |c| logic.delete_session(c)).await,
            _ => Response::error("Not Found", 404),
        }
    }
}
