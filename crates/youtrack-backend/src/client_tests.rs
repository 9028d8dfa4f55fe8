#[cfg(test)]
mod tests {
    use crate::client::{YouTrackClient, TOKEN_ENV_VAR};
    use crate::error::YouTrackError;
    use crate::BundleKind;
    use serial_test::serial;
    use tracker_core::{ClientSettings, CreateIssue};
    use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PROJECT_ID: &str = "myproject";

    fn xml(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "application/xml")
            .set_body_string(body.to_string())
    }

    async fn mount_xml(server: &MockServer, url_path: &str, body: &str) {
        Mock::given(method("GET"))
            .and(path(url_path.to_string()))
            .respond_with(xml(body))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_projects_uses_json_api() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/admin/projects/"))
            .and(query_param("fields", "name,shortName"))
            .and(header("Authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"name": "My project", "shortName": "myproject", "$type": "Project"},
                {"name": "Test project", "shortName": "testproject", "$type": "Project"}
            ])))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let projects = client.get_projects().unwrap();

        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].id, "myproject");
        assert_eq!(projects[0].name, "My project");
        assert_eq!(projects[1].id, "testproject");
    }

    #[tokio::test]
    async fn test_requests_carry_token_cookie_and_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/user/root"))
            .and(header("Authorization", "Bearer abcd1234"))
            .and(header(
                "Cookie",
                "jetbrains.charisma.main.security.PRINCIPAL=abcd1234",
            ))
            .and(header_regex("User-Agent", "^sentry-youtrack/"))
            .respond_with(xml(r#"<user login="root" fullName="Root" email="root@example.com"/>"#))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "abcd1234");
        let user = client.get_user("root").unwrap();

        assert_eq!(user.login, "root");
        assert_eq!(user.email.as_deref(), Some("root@example.com"));
    }

    #[tokio::test]
    async fn test_get_user_forbidden() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/user/bob"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let err = client.get_user("bob").unwrap_err();

        assert_eq!(err.status(), Some(403));
    }

    #[tokio::test]
    async fn test_unauthorized_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/user/bob"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "bad-token");
        let result = client.get_user("bob");

        assert!(matches!(result.unwrap_err(), YouTrackError::Unauthorized));
    }

    #[tokio::test]
    async fn test_get_project_name() {
        let mock_server = MockServer::start().await;
        mount_xml(
            &mock_server,
            "/rest/admin/project/myproject",
            r#"<project id="myproject" name="My project" lead="root"/>"#,
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        assert_eq!(client.get_project_name(PROJECT_ID).unwrap(), "My project");
    }

    async fn mount_project_fields(server: &MockServer) {
        let base = "http://youtrack.example.com/rest/admin/project/myproject/customfield";
        let refs = format!(
            r#"<projectCustomFieldRefs>
                <projectCustomField name="Priority" url="{base}/Priority"/>
                <projectCustomField name="State" url="{base}/State"/>
                <projectCustomField name="Assignee" url="{base}/Assignee"/>
                <projectCustomField name="Subsystem" url="{base}/Subsystem"/>
                <projectCustomField name="Fix versions" url="{base}/Fix%20versions"/>
                <projectCustomField name="Fixed in build" url="{base}/Fixed%20in%20build"/>
                <projectCustomField name="Estimation" url="{base}/Estimation"/>
            </projectCustomFieldRefs>"#
        );
        mount_xml(server, "/rest/admin/project/myproject/customfield", &refs).await;

        let details = [
            ("Priority", "Priority", "enum[1]", "No Priority", Some("Priorities")),
            ("State", "State", "state[1]", "No State", Some("States")),
            ("Assignee", "Assignee", "user[1]", "Unassigned", Some("Assignees")),
            ("Subsystem", "Subsystem", "ownedField[1]", "No Subsystem", Some("Subsystems")),
            ("Fix%20versions", "Fix versions", "version[*]", "Unscheduled", Some("Versions")),
            ("Fixed%20in%20build", "Fixed in build", "build[1]", "Next Build", Some("Builds")),
            ("Estimation", "Estimation", "integer", "?", None),
        ];
        for (segment, name, field_type, empty_text, bundle) in details {
            let param = bundle
                .map(|b| format!(r#"<param name="bundle" value="{}"/>"#, b))
                .unwrap_or_default();
            let body = format!(
                r#"<projectCustomField name="{name}" type="{field_type}" emptyText="{empty_text}">{param}</projectCustomField>"#
            );
            mount_xml(
                server,
                &format!("/rest/admin/project/myproject/customfield/{}", segment),
                &body,
            )
            .await;
        }

        mount_xml(
            server,
            "/rest/admin/customfield/bundle/Priorities",
            "<enumeration name=\"Priorities\"><value>Show-stopper</value><value>Critical</value><value>Major</value><value>Normal</value><value>Minor</value></enumeration>",
        )
        .await;
        mount_xml(
            server,
            "/rest/admin/customfield/stateBundle/States",
            "<stateBundle name=\"States\"><state>Submitted</state><state>Open</state><state isResolved=\"true\">Can't Reproduce</state></stateBundle>",
        )
        .await;
        mount_xml(
            server,
            "/rest/admin/customfield/userBundle/Assignees",
            r#"<userBundle name="Assignees"><user login="root"/><userGroup name="developers"/><userGroup name="qa"/></userBundle>"#,
        )
        .await;
        mount_xml(
            server,
            "/rest/admin/customfield/ownedFieldBundle/Subsystems",
            "<ownedFieldBundle name=\"Subsystems\"><ownedField>No subsystem</ownedField></ownedFieldBundle>",
        )
        .await;
        mount_xml(
            server,
            "/rest/admin/customfield/versionBundle/Versions",
            "<versions name=\"Versions\"/>",
        )
        .await;
        mount_xml(
            server,
            "/rest/admin/customfield/buildBundle/Builds",
            "<buildBundle name=\"Builds\"/>",
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/user"))
            .and(query_param("group", "developers"))
            .respond_with(xml(
                r#"<userRefs><user login="zoe" url="x"/><user login="root" url="x"/></userRefs>"#,
            ))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/rest/admin/user"))
            .and(query_param("group", "qa"))
            .respond_with(xml(r#"<userRefs><user login="alice" url="x"/></userRefs>"#))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_get_project_fields_resolves_every_bundle_kind() {
        let mock_server = MockServer::start().await;
        mount_project_fields(&mock_server).await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let fields = client.get_project_fields(PROJECT_ID, &[]).unwrap();

        assert_eq!(fields.len(), 7);

        assert_eq!(fields[0].name, "Priority");
        assert_eq!(fields[0].field_type, "enum[1]");
        assert_eq!(fields[0].empty_text.as_deref(), Some("No Priority"));
        assert_eq!(
            fields[0].values,
            Some(vec![
                "Show-stopper".to_string(),
                "Critical".to_string(),
                "Major".to_string(),
                "Normal".to_string(),
                "Minor".to_string()
            ])
        );

        assert_eq!(
            fields[1].values.as_deref().unwrap(),
            ["Submitted", "Open", "Can't Reproduce"]
        );

        // Group members merged with direct users, sorted and deduplicated
        assert_eq!(
            fields[2].values.as_deref().unwrap(),
            ["alice", "root", "zoe"]
        );

        assert_eq!(fields[3].values.as_deref().unwrap(), ["No subsystem"]);

        assert_eq!(fields[4].name, "Fix versions");
        assert_eq!(fields[4].field_type, "version[*]");
        assert_eq!(fields[4].values, Some(vec![]));

        assert_eq!(fields[5].values, Some(vec![]));

        // No bundle behind scalar types
        assert_eq!(fields[6].field_type, "integer");
        assert_eq!(fields[6].values, None);
    }

    #[tokio::test]
    async fn test_get_project_fields_skips_ignored_details() {
        let mock_server = MockServer::start().await;

        let base = format!("{}/rest/admin/project/myproject/customfield", mock_server.uri());
        mount_xml(
            &mock_server,
            "/rest/admin/project/myproject/customfield",
            &format!(
                r#"<projectCustomFieldRefs>
                    <projectCustomField name="Priority" url="{base}/Priority"/>
                    <projectCustomField name="Estimation" url="{base}/Estimation"/>
                </projectCustomFieldRefs>"#
            ),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/rest/admin/project/myproject/customfield/Priority"))
            .respond_with(xml("<projectCustomField/>"))
            .expect(0)
            .mount(&mock_server)
            .await;
        mount_xml(
            &mock_server,
            "/rest/admin/project/myproject/customfield/Estimation",
            r#"<projectCustomField name="Estimation" type="integer" emptyText="?"/>"#,
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");

        let refs = client.get_project_fields_list(PROJECT_ID).unwrap();
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].name, "Priority");

        let fields = client
            .get_project_fields(PROJECT_ID, &["Priority".to_string()])
            .unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name, "Estimation");
    }

    #[tokio::test]
    async fn test_unknown_field_type_has_no_values() {
        let mock_server = MockServer::start().await;

        mount_xml(
            &mock_server,
            "/rest/admin/project/myproject/customfield",
            r#"<projectCustomFieldRefs><projectCustomField name="Color" url="/rest/admin/project/myproject/customfield/Color"/></projectCustomFieldRefs>"#,
        )
        .await;
        mount_xml(
            &mock_server,
            "/rest/admin/project/myproject/customfield/Color",
            r#"<projectCustomField name="Color" type="color[1]" emptyText="None"><param name="bundle" value="Colors"/></projectCustomField>"#,
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let fields = client.get_project_fields(PROJECT_ID, &[]).unwrap();

        assert_eq!(fields[0].values, None);
    }

    #[tokio::test]
    async fn test_bundle_error_document() {
        let mock_server = MockServer::start().await;
        mount_xml(
            &mock_server,
            "/rest/admin/customfield/stateBundle/Missing",
            "<error>Bundle Missing not found</error>",
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let err = client
            .get_custom_field_values(BundleKind::State, "Missing")
            .unwrap_err();

        assert!(matches!(err, YouTrackError::Server(ref m) if m == "Bundle Missing not found"));
    }

    #[tokio::test]
    async fn test_get_priorities_english_bundle() {
        let mock_server = MockServer::start().await;
        mount_xml(
            &mock_server,
            "/rest/admin/customfield/bundle/Priorities",
            "<enumeration><value>Critical</value><value>Normal</value></enumeration>",
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        assert_eq!(client.get_priorities().unwrap(), vec!["Critical", "Normal"]);
    }

    #[tokio::test]
    async fn test_get_issue_types_falls_back_to_localized_bundle() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/customfield/bundle/Types"))
            .respond_with(ResponseTemplate::new(404).set_body_string("<error>Not found</error>"))
            .expect(1)
            .mount(&mock_server)
            .await;
        mount_xml(
            &mock_server,
            &format!(
                "/rest/admin/customfield/bundle/{}",
                urlencoding::encode("Типы")
            ),
            "<enumeration><value>Ошибка</value><value>Задача</value></enumeration>",
        )
        .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        assert_eq!(client.get_issue_types().unwrap(), vec!["Ошибка", "Задача"]);
    }

    #[tokio::test]
    async fn test_get_priorities_does_not_fall_back_on_server_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/admin/customfield/bundle/Priorities"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path(format!(
                "/rest/admin/customfield/bundle/{}",
                urlencoding::encode("Приоритеты")
            )))
            .respond_with(xml("<enumeration/>"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let err = client.get_priorities().unwrap_err();

        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_get_priorities_reports_last_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        assert!(client.get_priorities().unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_get_project_issues_with_paging() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/issue/byproject/myproject"))
            .and(query_param("max", "16"))
            .and(query_param("after", "15"))
            .and(query_param("filter", "crash"))
            .respond_with(xml(
                r#"<issues>
                    <issue id="myproject-16">
                        <field name="State"><value>Open</value></field>
                        <field name="summary"><value>App crash</value></field>
                    </issue>
                </issues>"#,
            ))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let issues = client
            .get_project_issues(PROJECT_ID, Some("crash"), 15, 16)
            .unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].id, "myproject-16");
        assert_eq!(issues[0].state.as_deref(), Some("Open"));
        assert_eq!(issues[0].summary, "App crash");
    }

    #[tokio::test]
    async fn test_create_issue_returns_id() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/issue"))
            .and(body_string_contains("project=myproject"))
            .and(body_string_contains("summary=Crash"))
            .respond_with(xml(r#"<issue id="myproject-42"/>"#))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let id = client
            .create_issue(&CreateIssue {
                project: PROJECT_ID.to_string(),
                summary: "Crash".to_string(),
                description: "Stacktrace".to_string(),
            })
            .unwrap();

        assert_eq!(id, "myproject-42");
    }

    #[tokio::test]
    async fn test_add_tags_sends_one_command_per_tag() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/issue/myproject-42/execute"))
            .and(body_string_contains("sentry"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;
        Mock::given(method("POST"))
            .and(path("/rest/issue/myproject-42/execute"))
            .and(body_string_contains("backend"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        client
            .add_tags(
                "myproject-42",
                &["sentry".to_string(), "backend".to_string()],
            )
            .unwrap();
    }

    #[tokio::test]
    async fn test_execute_command_failure_propagates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/rest/issue/myproject-42/execute"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&mock_server)
            .await;

        let client = YouTrackClient::new(&mock_server.uri(), "test-token");
        let err = client
            .execute_command("myproject-42", "Priority Critical")
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_from_settings_rejects_url_without_scheme() {
        let result = YouTrackClient::from_settings(&ClientSettings {
            url: "youtrack.example.com".to_string(),
            api_key: Some("key".to_string()),
            verify_ssl_certificate: true,
        });

        assert!(matches!(result, Err(YouTrackError::InvalidUrl(_))));
    }

    #[test]
    fn test_from_settings_trims_trailing_slash() {
        let client = YouTrackClient::from_settings(&ClientSettings {
            url: "https://yoursitename.myjetbrains.com/youtrack/".to_string(),
            api_key: Some("key".to_string()),
            verify_ssl_certificate: false,
        })
        .unwrap();

        assert_eq!(client.base_url(), "https://yoursitename.myjetbrains.com/youtrack");
        assert_eq!(client.api_key(), "key");
    }

    #[test]
    #[serial]
    fn test_from_settings_reads_token_from_env() {
        std::env::set_var(TOKEN_ENV_VAR, "env-token");
        let client = YouTrackClient::from_settings(&ClientSettings {
            url: "https://youtrack.example.com".to_string(),
            api_key: None,
            verify_ssl_certificate: true,
        })
        .unwrap();
        std::env::remove_var(TOKEN_ENV_VAR);

        assert_eq!(client.api_key(), "env-token");
    }

    #[test]
    #[serial]
    fn test_from_settings_missing_env_token_is_empty() {
        std::env::remove_var(TOKEN_ENV_VAR);
        let client = YouTrackClient::from_settings(&ClientSettings {
            url: "https://youtrack.example.com".to_string(),
            api_key: None,
            verify_ssl_certificate: true,
        })
        .unwrap();

        assert_eq!(client.api_key(), "");
    }

    #[test]
    fn test_connection_refused_is_connection_error() {
        // Nothing listens on port 9 locally
        let client = YouTrackClient::new("http://127.0.0.1:9", "test-token");
        let err = client.get_user("root").unwrap_err();

        assert!(matches!(err, YouTrackError::Connection(_)));
    }
}
