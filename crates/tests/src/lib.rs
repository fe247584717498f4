//! # Integration Tests
//!
//! End-to-end scenarios across crates.
//!
//! Covers:
//! - Wire format snapshots
//! - Sampling -> conditioning -> publishing over a mock link
//! - Degraded sessions (no sensor, no server)

#[cfg(test)]
mod contract_tests {
    use contracts::{ClientMessage, ConditionedSample, PlayerIdentity};

    #[test]
    fn test_wire_format_snapshot() {
        let ada = PlayerIdentity::new("Ada");
        assert_eq!(
            ClientMessage::register(&ada).encode().unwrap(),
            r#"{"type":"registerPlayer","value":{"playerName":"Ada"}}"#
        );
        assert_eq!(
            ClientMessage::ready(&ada).encode().unwrap(),
            r#"{"type":"ready","value":{"playerName":"Ada"}}"#
        );
        assert_eq!(
            ClientMessage::controls(&ConditionedSample::from_axes([Some(-1.5), None, Some(0.0)]))
                .encode()
                .unwrap(),
            r#"{"type":"controls","value":{"alpha":-1.5,"beta":null,"gamma":0.0}}"#
        );
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use conditioner::SignalConditioner;
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{
        AccessOutcome, ChannelClosed, ConnectionState, OrientationSample, PlayerIdentity,
        SamplingConfig,
    };
    use link::{ConnectionManager, LinkConfig, LinkError, LinkEvent, MockTransport};
    use observability::ControlStats;
    use orientation::{OrientationError, OrientationSource, ScriptedPlatform};
    use publisher::ControlPublisher;

    fn link_config(max_attempts: u32, retry_delay_ms: u64) -> LinkConfig {
        LinkConfig {
            max_attempts,
            retry_delay: Duration::from_millis(retry_delay_ms),
            ..Default::default()
        }
    }

    fn registration(name: &str) -> String {
        format!(r#"{{"type":"registerPlayer","value":{{"playerName":"{name}"}}}}"#)
    }

    /// End-to-end: ScriptedPlatform -> SignalConditioner -> ControlPublisher -> MockTransport
    ///
    /// Uncalibrated output equals the raw reading; after calibrating on the
    /// same reading the next output is zero on every axis.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_calibration_zeroes_controls() {
        let raw = OrientationSample::new(10.0, 5.0, 0.0);
        let platform = Arc::new(ScriptedPlatform::from_samples([raw, raw]));
        let source = OrientationSource::new(platform, SamplingConfig::default());
        let (sampler, mut samples) = source.start().unwrap();

        let transport = MockTransport::new();
        let link = Arc::new(ConnectionManager::new(
            transport.clone(),
            link_config(5, 2000),
            PlayerIdentity::new("Ada"),
        ));
        link.connect();
        link.wait_connected().await.unwrap();

        let publisher = ControlPublisher::new(Arc::clone(&link));
        let mut conditioner = SignalConditioner::new(0.1).unwrap();
        let mut stats = ControlStats::new();

        let first = samples.recv().await.unwrap();
        let out = conditioner.transform(&first);
        stats.record_tick(&out, publisher.publish(&out), 0.0);

        conditioner.calibrate_latest();
        stats.record_calibration();

        let second = samples.recv().await.unwrap();
        let out = conditioner.transform(&second);
        stats.record_tick(&out, publisher.publish(&out), 0.0);

        sampler.stop().await;
        link.shutdown().await;

        assert_eq!(
            transport.frames(0),
            [
                registration("Ada"),
                r#"{"type":"controls","value":{"alpha":10.0,"beta":5.0,"gamma":0.0}}"#.to_string(),
                r#"{"type":"controls","value":{"alpha":0.0,"beta":0.0,"gamma":0.0}}"#.to_string(),
            ]
        );

        let summary = stats.summary();
        assert_eq!(summary.ticks, 2);
        assert_eq!(summary.delivered, 2);
        assert_eq!(summary.calibrations, 1);
        assert_eq!(publisher.metrics().snapshot().forwarded, 2);
    }

    /// Denied or unsupported orientation never produces samples, but the
    /// link still connects and carries the ready message.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_no_sensor_connection_still_usable() {
        let denied = Arc::new(
            ScriptedPlatform::from_samples([OrientationSample::new(1.0, 2.0, 3.0)])
                .with_permission(AccessOutcome::Denied),
        );
        let source = OrientationSource::new(denied.clone(), SamplingConfig::default());
        assert_eq!(source.start().unwrap_err(), OrientationError::PermissionDenied);
        assert_eq!(denied.prompts(), 1);
        assert_eq!(denied.remaining(), 1, "nothing may be read without consent");

        let unsupported = OrientationSource::new(
            Arc::new(ScriptedPlatform::unsupported()),
            SamplingConfig::default(),
        );
        assert!(matches!(
            unsupported.start(),
            Err(OrientationError::UnsupportedPlatform { .. })
        ));

        let transport = MockTransport::new();
        let link = ConnectionManager::new(
            transport.clone(),
            link_config(5, 2000),
            PlayerIdentity::new("Ada"),
        );
        link.connect();
        link.wait_connected().await.unwrap();
        assert!(link.send_ready());

        assert_eq!(
            transport.frames(0),
            [
                registration("Ada"),
                r#"{"type":"ready","value":{"playerName":"Ada"}}"#.to_string(),
            ]
        );
        link.shutdown().await;
    }

    /// A budget of five allows the initial attempt plus five retries; the
    /// sixth refusal ends in Failed and no seventh attempt is ever made.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_gives_up_after_budget() {
        let transport = MockTransport::refusing();
        let link = ConnectionManager::new(
            transport.clone(),
            link_config(5, 2000),
            PlayerIdentity::default(),
        );
        link.connect();

        let err = link.wait_connected().await.unwrap_err();
        assert!(matches!(err, LinkError::ExhaustedRetries { attempts: 6 }));
        assert_eq!(err.to_string(), "could not connect after 6 attempts");
        assert_eq!(link.state(), ConnectionState::Failed);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(transport.attempts(), 6);
        assert!(!link.send_controls(&Default::default()));
    }

    /// A dropped connection is re-established and registration is again the
    /// first frame; controls resume on the new connection.
    #[tokio::test(start_paused = true)]
    async fn test_e2e_reconnect_reregisters() {
        let transport = MockTransport::new();
        let link = Arc::new(ConnectionManager::new(
            transport.clone(),
            link_config(5, 100),
            PlayerIdentity::new("Ada"),
        ));
        let mut events = link.subscribe();
        let publisher = ControlPublisher::new(Arc::clone(&link));

        link.connect();
        assert_eq!(events.recv().await.unwrap(), LinkEvent::Connected);

        transport.close(0, ChannelClosed::Error("reset by peer".to_string()));
        assert!(matches!(
            events.recv().await.unwrap(),
            LinkEvent::Retrying { attempt: 1, max: 5, .. }
        ));
        assert_eq!(events.recv().await.unwrap(), LinkEvent::Connected);
        assert_eq!(link.attempt(), 0);

        let mut conditioner = SignalConditioner::new(0.5).unwrap();
        let out = conditioner.transform(&OrientationSample::new(4.0, 2.0, 0.0));
        assert!(publisher.publish(&out));

        assert_eq!(
            transport.frames(1),
            [
                registration("Ada"),
                r#"{"type":"controls","value":{"alpha":4.0,"beta":2.0,"gamma":0.0}}"#.to_string(),
            ]
        );
        link.shutdown().await;
    }

    /// Configuration text flows into every component
    #[tokio::test(start_paused = true)]
    async fn test_e2e_config_drives_components() {
        let toml = r#"
            [server]
            endpoint = "127.0.0.1:9001"

            [player]
            name = "  Grace "

            [conditioning]
            smoothing_factor = 0.5

            [retry]
            max_attempts = 2
            delay_ms = 10
        "#;
        let config = ConfigLoader::load_from_str(toml, ConfigFormat::Toml).unwrap();

        let link_config = LinkConfig::from(&config);
        assert_eq!(link_config.endpoint.ws_url(), "ws://127.0.0.1:9001");
        assert_eq!(link_config.max_attempts, 2);

        let mut conditioner = SignalConditioner::from_config(&config.conditioning).unwrap();
        conditioner.transform(&OrientationSample::new(0.0, 0.0, 0.0));
        let out = conditioner.transform(&OrientationSample::new(2.0, 2.0, 2.0));
        assert_eq!(out.alpha, Some(1.0));

        let transport = MockTransport::with_script([link::MockOutcome::refuse("busy")]);
        let link = ConnectionManager::new(transport.clone(), link_config, config.identity());
        link.connect();
        link.wait_connected().await.unwrap();
        assert_eq!(transport.attempts(), 2);
        assert_eq!(transport.frames(0), [registration("Grace")]);
        link.shutdown().await;
    }
}
