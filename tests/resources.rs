// This file is part of the terraform-provider-lidarr project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! Resource and data source handlers against a mocked Lidarr server

use serde_json::json;
use terraform_provider_lidarr::client::{Client, DEFAULT_TIMEOUT};
use terraform_provider_lidarr::generic::{FieldDataSource, FieldResource};
use terraform_provider_lidarr::indexer::{Indexer, IndexerState};
use terraform_provider_lidarr::tag::{TagDataSource, TagResource, TagState};
use terraform_provider_lidarr::ClientHandle;
use tf_provider::value::Value;
use tf_provider::{DataSource, Diagnostics, Resource};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn handle(server: &MockServer) -> ClientHandle {
    ClientHandle::new(Client::new(&server.uri(), "key", DEFAULT_TIMEOUT).unwrap())
}

fn torznab_config() -> IndexerState {
    IndexerState {
        name: Value::Value("Jackett".into()),
        implementation: Value::Value("Torznab".into()),
        config_contract: Value::Value("TorznabSettings".into()),
        protocol: Value::Value("torrent".into()),
        base_url: Value::Value("http://jackett:9117/api/v2.0/indexers/all/results/torznab".into()),
        api_key: Value::Value("jackett-key".into()),
        seed_ratio: Value::Value(2.0),
        seed_time: Value::Value(1440),
        ..Default::default()
    }
}

fn torznab_response(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Jackett",
        "implementation": "Torznab",
        "configContract": "TorznabSettings",
        "protocol": "torrent",
        "priority": 25,
        "downloadClientId": 0,
        "enableRss": true,
        "enableAutomaticSearch": true,
        "enableInteractiveSearch": true,
        "tags": [],
        "fields": [
            {"name": "baseUrl", "value": "http://jackett:9117/api/v2.0/indexers/all/results/torznab"},
            {"name": "apiPath", "value": "/api"},
            {"name": "apiKey", "value": "********"},
            {"name": "categories", "value": [3000, 3010, 3030, 3040]},
            {"name": "minimumSeeders", "value": 1},
            {"name": "seedCriteria.seedRatio", "value": 2.0},
            {"name": "seedCriteria.seedTime", "value": 1440},
            {"name": "seedCriteria.discographySeedTime"}
        ]
    })
}

#[tokio::test]
async fn create_indexer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/indexer"))
        .and(body_partial_json(json!({
            "name": "Jackett",
            "protocol": "torrent",
            "priority": 25,
            "enableRss": true,
            "fields": [
                {"name": "seedCriteria.seedTime", "value": 1440},
                {"name": "seedCriteria.seedRatio", "value": 2.0},
                {"name": "apiKey", "value": "jackett-key"},
                {"name": "baseUrl", "value": "http://jackett:9117/api/v2.0/indexers/all/results/torznab"}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(torznab_response(7)))
        .expect(1)
        .mount(&server)
        .await;

    let resource = FieldResource::<Indexer>::new(handle(&server));
    let mut diags = Diagnostics::default();

    let config = torznab_config();
    let (planned, private) = resource
        .plan_create(&mut diags, config.clone(), config.clone(), Default::default())
        .await
        .unwrap();
    assert!(planned.id.is_unknown());
    assert!(planned.minimum_seeders.is_unknown());
    assert_eq!(planned.priority, Value::Value(25));

    let (state, _) = resource
        .create(&mut diags, planned, config, private, Default::default())
        .await
        .unwrap();
    assert!(diags.errors.is_empty(), "{diags:?}");

    assert_eq!(state.id, Value::Value(7));
    assert_eq!(state.api_key, Value::Value("jackett-key".into()));
    assert_eq!(state.minimum_seeders, Value::Value(1));
    assert_eq!(state.api_path, Value::Value("/api".into()));
    assert_eq!(state.discography_seed_time, Value::Null);
    assert_eq!(state.cookie, Value::Null);
    assert_eq!(state.tags, Value::Value(Default::default()));
}

#[tokio::test]
async fn read_tracks_server_changes() {
    let server = MockServer::start().await;
    let mut response = torznab_response(7);
    response["fields"] = json!([
        {"name": "baseUrl", "value": "http://prowlarr:9696/1/"},
        {"name": "apiKey", "value": "********"}
    ]);
    Mock::given(method("GET"))
        .and(path("/api/v1/indexer/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .mount(&server)
        .await;

    let resource = FieldResource::<Indexer>::new(handle(&server));
    let mut diags = Diagnostics::default();
    let prior = IndexerState {
        id: Value::Value(7),
        ..torznab_config()
    };
    let (state, _) = resource
        .read(&mut diags, prior, Default::default(), Default::default())
        .await
        .unwrap();

    assert_eq!(state.base_url, Value::Value("http://prowlarr:9696/1/".into()));
    assert_eq!(state.api_key, Value::Value("jackett-key".into()));
    assert_eq!(state.seed_time, Value::Null);
    assert_eq!(state.seed_ratio, Value::Null);
}

#[tokio::test]
async fn vanished_indexer_leaves_the_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indexer/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/indexer/7"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let resource = FieldResource::<Indexer>::new(handle(&server));
    let mut diags = Diagnostics::default();
    let prior = IndexerState {
        id: Value::Value(7),
        ..torznab_config()
    };

    let read = resource
        .read(&mut diags, prior.clone(), Default::default(), Default::default())
        .await;
    assert!(read.is_none());
    assert!(diags.errors.is_empty());

    let private = resource
        .plan_destroy(&mut diags, prior.clone(), Default::default(), Default::default())
        .await
        .unwrap();
    let destroyed = resource
        .destroy(&mut diags, prior, private, Default::default())
        .await;
    assert!(destroyed.is_some());
    assert!(diags.errors.is_empty());
}

#[tokio::test]
async fn server_errors_become_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/indexer/7"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database is locked"))
        .mount(&server)
        .await;

    let resource = FieldResource::<Indexer>::new(handle(&server));
    let mut diags = Diagnostics::default();
    let prior = IndexerState {
        id: Value::Value(7),
        ..torznab_config()
    };
    let updated = resource
        .update(
            &mut diags,
            prior.clone(),
            prior.clone(),
            prior,
            Default::default(),
            Default::default(),
        )
        .await;

    assert!(updated.is_none());
    assert_eq!(diags.errors.len(), 1);
    assert!(diags.errors[0].detail.contains("database is locked"));
}

#[tokio::test]
async fn import_then_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indexer/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(torznab_response(7)))
        .mount(&server)
        .await;

    let resource = FieldResource::<Indexer>::new(handle(&server));
    let mut diags = Diagnostics::default();
    let (imported, private) = resource
        .import(&mut diags, String::from("7"))
        .await
        .unwrap();
    let (state, _) = resource
        .read(&mut diags, imported, private, Default::default())
        .await
        .unwrap();

    assert_eq!(state.name, Value::Value("Jackett".into()));
    assert_eq!(state.seed_time, Value::Value(1440));
    // The secret cannot be recovered from the server
    assert_eq!(state.api_key, Value::Null);
}

#[tokio::test]
async fn plan_update_keeps_the_id() {
    let resource = FieldResource::<Indexer>::new(ClientHandle::default());
    let mut diags = Diagnostics::default();
    let prior = IndexerState {
        id: Value::Value(7),
        ..torznab_config()
    };
    let proposed = IndexerState {
        priority: Value::Value(1),
        ..torznab_config()
    };

    let (planned, _, replace) = resource
        .plan_update(
            &mut diags,
            prior.clone(),
            proposed.clone(),
            proposed.clone(),
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(planned.id, Value::Value(7));
    assert!(replace.is_empty());

    let switched = IndexerState {
        implementation: Value::Value("Newznab".into()),
        ..proposed
    };
    let (_, _, replace) = resource
        .plan_update(
            &mut diags,
            prior,
            switched.clone(),
            switched,
            Default::default(),
            Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(replace.len(), 1);
}

#[tokio::test]
async fn unconfigured_provider() {
    let resource = FieldResource::<Indexer>::new(ClientHandle::default());
    let mut diags = Diagnostics::default();
    let created = resource
        .create(
            &mut diags,
            torznab_config(),
            torznab_config(),
            Default::default(),
            Default::default(),
        )
        .await;
    assert!(created.is_none());
    assert_eq!(diags.errors.len(), 1);
}

#[tokio::test]
async fn data_sources_lookup_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/indexer"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([torznab_response(7)])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tag"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"id": 4, "label": "lossless"}])),
        )
        .mount(&server)
        .await;

    let mut diags = Diagnostics::default();
    let indexers = FieldDataSource::<Indexer>::new(handle(&server));
    let found = indexers
        .read(
            &mut diags,
            IndexerState {
                name: Value::Value("Jackett".into()),
                ..Default::default()
            },
            Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(found.id, Value::Value(7));
    assert_eq!(
        found.categories,
        Value::Value(vec![
            Value::Value(3000),
            Value::Value(3010),
            Value::Value(3030),
            Value::Value(3040)
        ])
    );
    assert_eq!(found.username, Value::Null);

    let missing = indexers
        .read(
            &mut diags,
            IndexerState {
                name: Value::Value("jackett".into()),
                ..Default::default()
            },
            Default::default(),
        )
        .await;
    assert!(missing.is_none());
    assert_eq!(diags.errors.len(), 1);

    let mut diags = Diagnostics::default();
    let tags = TagDataSource::new(handle(&server));
    let tag = tags
        .read(
            &mut diags,
            TagState {
                label: Value::Value("Lossless".into()),
                ..Default::default()
            },
            Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(tag.id, Value::Value(4));
    assert_eq!(tag.label, Value::Value("Lossless".into()));
}

#[tokio::test]
async fn tag_lifecycle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/tag"))
        .and(body_partial_json(json!({"label": "flac"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 3, "label": "flac"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/tag/3"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/v1/tag/3"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let resource = TagResource::new(handle(&server));
    let mut diags = Diagnostics::default();

    let uppercase = TagState {
        label: Value::Value("FLAC".into()),
        ..Default::default()
    };
    assert!(resource.validate(&mut diags, uppercase).await.is_none());
    assert_eq!(diags.errors.len(), 1);

    let mut diags = Diagnostics::default();
    let config = TagState {
        label: Value::Value("flac".into()),
        ..Default::default()
    };
    let (planned, private) = resource
        .plan_create(&mut diags, config.clone(), config.clone(), Default::default())
        .await
        .unwrap();
    let (state, private) = resource
        .create(&mut diags, planned, config, private, Default::default())
        .await
        .unwrap();
    assert_eq!(state.id, Value::Value(3));

    assert!(resource
        .read(&mut diags, state.clone(), private.clone(), Default::default())
        .await
        .is_none());
    assert!(diags.errors.is_empty());

    let private = resource
        .plan_destroy(&mut diags, state.clone(), private, Default::default())
        .await
        .unwrap();
    assert!(resource
        .destroy(&mut diags, state, private, Default::default())
        .await
        .is_some());
    assert!(diags.errors.is_empty());
}
