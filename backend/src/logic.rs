use crate::accounts::Accounts;
use crate::error::{DeskError, DeskResult};
use crate::repository::Repository;
use eventdesk_shared::document::operator_names;
use eventdesk_shared::protocol::UpdateEventRequest;
use eventdesk_shared::{Credentials, EventDocument, Session, StoredEvent, Timestamp};
use std::cmp::Ordering;
use std::time::Duration;

// =========================================================
// 事件
// =========================================================

/// 事件集合的业务规则
///
/// 不依赖 worker 的 Env/Request/Response，测试时注入 MockRepository
pub struct EventLogic<'a, R: Repository> {
    repo: &'a R,
}

impl<'a, R: Repository> EventLogic<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo }
    }

    /// 全量读取，按开始日期降序，没有开始日期的排在最后
    pub async fn list_events(&self) -> DeskResult<Vec<StoredEvent>> {
        let mut events = self.repo.list_events().await?;
        events.sort_by(|a, b| {
            match (a.document.fecha_inicio, b.document.fecha_inicio) {
                (Some(x), Some(y)) => y.cmp(&x),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            }
        });
        Ok(events)
    }

    /// 新建：分配 id，写入创建与更新时间
    pub async fn create_event(
        &self,
        mut document: EventDocument,
        now: Timestamp,
    ) -> DeskResult<StoredEvent> {
        validate_document(&document)?;

        let id = uuid::Uuid::new_v4().simple().to_string();
        document.fecha_creacion = Some(now);
        document.fecha_actualizacion = Some(now);

        self.repo
            .put_event(&id, &document)
            .await
            .map_err(|e| e.in_op("events.create"))?;
        Ok(StoredEvent { id, document })
    }

    /// 按 id 整体覆盖；保留原有创建时间
    pub async fn update_event(
        &self,
        req: UpdateEventRequest,
        now: Timestamp,
    ) -> DeskResult<StoredEvent> {
        let UpdateEventRequest { id, mut document } = req;
        validate_document(&document)?;

        let existing = self
            .repo
            .get_event(&id)
            .await?
            .ok_or_else(|| DeskError::event_not_found(&id).in_op("events.update"))?;

        document.fecha_creacion = existing.fecha_creacion.or(document.fecha_creacion);
        document.fecha_actualizacion = Some(now);

        self.repo.put_event(&id, &document).await?;
        Ok(StoredEvent { id, document })
    }

    pub async fn delete_event(&self, id: &str) -> DeskResult<bool> {
        self.repo.delete_event(id).await
    }

    /// 操作员名称：跳过空名称，按字母排序
    pub async fn list_operators(&self, seed: &[String]) -> DeskResult<Vec<String>> {
        let docs = self.repo.list_operators(seed).await?;
        Ok(operator_names(&docs))
    }
}

fn validate_document(document: &EventDocument) -> DeskResult<()> {
    let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
    if !filled(&document.nombre_evento) {
        return Err(DeskError::invalid_input("nombreEvento is required"));
    }
    Ok(())
}

// =========================================================
// 认证
// =========================================================

pub struct AuthLogic<'a, R: Repository> {
    repo: &'a R,
    accounts: &'a Accounts,
    ttl: Duration,
}

impl<'a, R: Repository> AuthLogic<'a, R> {
    pub fn new(repo: &'a R, accounts: &'a Accounts, ttl: Duration) -> Self {
        Self {
            repo,
            accounts,
            ttl,
        }
    }

    /// 校验凭据并签发新会话
    pub async fn sign_in(&self, credentials: Credentials, now: Timestamp) -> DeskResult<Session> {
        if let Err(e) = credentials.validate() {
            return Err(DeskError::invalid_input(e.to_string()).with_code("auth/invalid-email"));
        }

        let email = self
            .accounts
            .verify(&credentials.email, &credentials.password)
            .map_err(|code| {
                DeskError::unauthorized(code.message())
                    .with_code(code.as_str())
                    .in_op("auth.sign_in")
            })?;

        let session = Session {
            token: uuid::Uuid::new_v4().simple().to_string(),
            email,
            expires_at: now + self.ttl,
        };
        self.repo.put_session(&session).await?;
        Ok(session)
    }

    /// 删除会话；不存在的 token 也视为成功
    pub async fn sign_out(&self, token: &str) -> DeskResult<()> {
        self.repo.delete_session(token).await?;
        Ok(())
    }

    /// 查询有效会话；过期会话会被顺手删除
    pub async fn current_session(&self, token: &str, now: Timestamp) -> DeskResult<Session> {
        if token.trim().is_empty() {
            return Err(DeskError::unauthorized("Missing session token"));
        }
        let session = self
            .repo
            .get_session(token)
            .await?
            .ok_or_else(|| DeskError::unauthorized("Session not found"))?;

        if session.expires_at <= now {
            self.repo.delete_session(token).await?;
            return Err(DeskError::unauthorized("Session expired"));
        }
        Ok(session)
    }
}

// =========================================================
// 单元测试 (无需 Miniflare/Wasm 环境)
// =========================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeskErrorStatus;
    use crate::repository::tests::MockRepository;
    use eventdesk_shared::OperatorDocument;

    const NOW: Timestamp = Timestamp::new(1_710_460_800_000);

    fn doc(name: &str, start: Option<i64>) -> EventDocument {
        EventDocument {
            nombre_evento: Some(name.into()),
            operador: Some("Ana".into()),
            fecha_inicio: start.map(Timestamp::new),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = MockRepository::new();
        let logic = EventLogic::new(&repo);

        let created = logic.create_event(doc("Congreso", None), NOW).await.unwrap();
        assert!(!created.id.is_empty());
        assert_eq!(created.document.fecha_creacion, Some(NOW));
        assert_eq!(created.document.fecha_actualizacion, Some(NOW));

        let stored = repo.events.borrow();
        assert_eq!(stored.len(), 1);
        assert!(stored.contains_key(&created.id));
    }

    #[tokio::test]
    async fn test_create_validation() {
        let repo = MockRepository::new();
        let logic = EventLogic::new(&repo);

        let mut invalid = doc("  ", None);
        let err = logic.create_event(invalid.clone(), NOW).await.unwrap_err();
        assert_eq!(err.status, DeskErrorStatus::InvalidInput);

        invalid.nombre_evento = None;
        let err = logic.create_event(invalid, NOW).await.unwrap_err();
        assert_eq!(err.message(), "nombreEvento is required");
        assert!(repo.events.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_list_sorted_by_start_desc() {
        let repo = MockRepository::new();
        repo.put_event("a", &doc("old", Some(1_000))).await.unwrap();
        repo.put_event("b", &doc("none", None)).await.unwrap();
        repo.put_event("c", &doc("new", Some(2_000))).await.unwrap();

        let logic = EventLogic::new(&repo);
        let ids: Vec<_> = logic
            .list_events()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[tokio::test]
    async fn test_update_keeps_creation_time() {
        let repo = MockRepository::new();
        let logic = EventLogic::new(&repo);
        let created = logic.create_event(doc("Congreso", None), NOW).await.unwrap();

        let later = Timestamp::new(NOW.as_millis() + 60_000);
        let updated = logic
            .update_event(
                UpdateEventRequest {
                    id: created.id.clone(),
                    document: doc("Congreso 2", None),
                },
                later,
            )
            .await
            .unwrap();
        assert_eq!(updated.document.fecha_creacion, Some(NOW));
        assert_eq!(updated.document.fecha_actualizacion, Some(later));
        assert_eq!(
            repo.events.borrow()[&created.id].nombre_evento.as_deref(),
            Some("Congreso 2")
        );
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MockRepository::new();
        let logic = EventLogic::new(&repo);
        let err = logic
            .update_event(
                UpdateEventRequest {
                    id: "nope".into(),
                    document: doc("x", None),
                },
                NOW,
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert!(repo.events.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = MockRepository::new();
        let logic = EventLogic::new(&repo);
        let created = logic.create_event(doc("x", None), NOW).await.unwrap();
        assert!(logic.delete_event(&created.id).await.unwrap());
        assert!(!logic.delete_event(&created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_operators_sorted() {
        let repo = MockRepository::new();
        repo.operators.borrow_mut().extend([
            OperatorDocument {
                nombre: Some("Luis".into()),
            },
            OperatorDocument { nombre: None },
            OperatorDocument {
                nombre: Some("Ana".into()),
            },
        ]);
        let logic = EventLogic::new(&repo);
        assert_eq!(
            logic.list_operators(&[]).await.unwrap(),
            vec!["Ana", "Luis"]
        );
    }

    // --- 认证 ---

    fn accounts() -> Accounts {
        Accounts::parse("ana@example.com:secreto1")
    }

    #[tokio::test]
    async fn test_sign_in_issues_session() {
        let repo = MockRepository::new();
        let accounts = accounts();
        let auth = AuthLogic::new(&repo, &accounts, Duration::from_secs(60));

        let session = auth
            .sign_in(Credentials::new("ana@example.com", "secreto1"), NOW)
            .await
            .unwrap();
        assert_eq!(session.email, "ana@example.com");
        assert_eq!(session.expires_at.as_millis(), NOW.as_millis() + 60_000);
        assert!(repo.sessions.borrow().contains_key(&session.token));

        let current = auth.current_session(&session.token, NOW).await.unwrap();
        assert_eq!(current, session);
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let repo = MockRepository::new();
        let accounts = accounts();
        let auth = AuthLogic::new(&repo, &accounts, Duration::from_secs(60));

        let err = auth
            .sign_in(Credentials::new("ana@example.com", "otraclave"), NOW)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
        assert_eq!(err.error_code(), "auth/invalid-credential");
        assert!(repo.sessions.borrow().is_empty());

        let err = auth
            .sign_in(Credentials::new("no-es-correo", "secreto1"), NOW)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.error_code(), "auth/invalid-email");
    }

    #[tokio::test]
    async fn test_expired_session_removed() {
        let repo = MockRepository::new();
        let accounts = accounts();
        let auth = AuthLogic::new(&repo, &accounts, Duration::from_secs(1));
        let session = auth
            .sign_in(Credentials::new("ana@example.com", "secreto1"), NOW)
            .await
            .unwrap();

        let later = Timestamp::new(NOW.as_millis() + 1_000);
        let err = auth.current_session(&session.token, later).await.unwrap_err();
        assert_eq!(err.status, DeskErrorStatus::Unauthorized);
        assert!(repo.sessions.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_sign_out() {
        let repo = MockRepository::new();
        let accounts = accounts();
        let auth = AuthLogic::new(&repo, &accounts, Duration::from_secs(60));
        let session = auth
            .sign_in(Credentials::new("ana@example.com", "secreto1"), NOW)
            .await
            .unwrap();

        auth.sign_out(&session.token).await.unwrap();
        auth.sign_out("unknown").await.unwrap();
        assert!(auth.current_session(&session.token, NOW).await.is_err());
        assert!(auth.current_session("", NOW).await.is_err());
    }
}
