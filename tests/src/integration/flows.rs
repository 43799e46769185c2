//! # Integration Test Flows
//!
//! Cut validation, dispatch, and atomic-abort behavior observed through
//! the public ports of a fully wired service: gate -> cut processor ->
//! registry -> router -> loupe -> event sink.

#[cfg(test)]
mod tests {
    use facet_core::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn operator() -> Address {
        Address::new([0xAD; 20])
    }

    fn outsider() -> Address {
        Address::new([0xEE; 20])
    }

    fn module(tag: u8) -> Address {
        Address::new([tag; 20])
    }

    fn sel(tag: u8) -> Selector {
        Selector::new([0, 0, 0, tag])
    }

    /// A service whose host answers every listed module with an echo.
    fn service_with_echo_modules(
        modules: &[Address],
    ) -> FacetCoreService<InMemoryModuleHost, RecordingEventSink> {
        let service = create_test_service(operator());
        for &m in modules {
            service
                .host()
                .register_fn(m, |_ctx, payload| Ok(Bytes::from_slice(payload)));
        }
        service
    }

    /// Loupe state flattened for before/after comparisons.
    async fn loupe_snapshot(
        service: &FacetCoreService<InMemoryModuleHost, RecordingEventSink>,
    ) -> Vec<Facet> {
        service.facets().await
    }

    // =============================================================================
    // CUT COMMIT PATHS
    // =============================================================================

    /// Property: after committing an Add-only batch on unmapped
    /// selectors, every selector routes to the target module.
    #[tokio::test]
    async fn test_add_only_batch_maps_every_selector() {
        let service = service_with_echo_modules(&[module(1), module(2)]);

        let batch = vec![
            CutOp::add(module(1), vec![sel(1), sel(2)]),
            CutOp::add(module(2), vec![sel(3)]),
        ];
        let receipt = service
            .submit_cut(operator(), batch.clone(), None)
            .await
            .unwrap();
        assert_eq!(receipt.operations, batch);

        assert_eq!(service.facet_address(sel(1)).await, Some(module(1)));
        assert_eq!(service.facet_address(sel(2)).await, Some(module(1)));
        assert_eq!(service.facet_address(sel(3)).await, Some(module(2)));
        assert_eq!(service.facet_addresses().await, vec![module(1), module(2)]);
    }

    /// Property: Add then Remove of the same selectors is idempotent
    /// against a non-trivial baseline.
    #[tokio::test]
    async fn test_add_then_remove_is_idempotent() {
        let service = service_with_echo_modules(&[module(1), module(2)]);
        service
            .submit_cut(operator(), vec![CutOp::add(module(2), vec![sel(9)])], None)
            .await
            .unwrap();

        let baseline = loupe_snapshot(&service).await;

        service
            .submit_cut(
                operator(),
                vec![CutOp::add(module(1), vec![sel(1), sel(2)])],
                None,
            )
            .await
            .unwrap();
        service
            .submit_cut(operator(), vec![CutOp::remove(vec![sel(1), sel(2)])], None)
            .await
            .unwrap();

        assert_eq!(loupe_snapshot(&service).await, baseline);
        assert_eq!(service.facet_address(sel(1)).await, None);
        assert_eq!(service.facet_address(sel(2)).await, None);
    }

    /// Property: Replace updates the mapping and both facet selector
    /// lists.
    #[tokio::test]
    async fn test_replace_updates_both_facets() {
        let service = service_with_echo_modules(&[module(1), module(2)]);
        service
            .submit_cut(
                operator(),
                vec![CutOp::add(module(1), vec![sel(1), sel(2)])],
                None,
            )
            .await
            .unwrap();

        service
            .submit_cut(
                operator(),
                vec![CutOp::replace(module(2), vec![sel(1)])],
                None,
            )
            .await
            .unwrap();

        assert_eq!(service.facet_address(sel(1)).await, Some(module(2)));
        assert_eq!(
            service.facet_function_selectors(module(1)).await,
            vec![sel(2)]
        );
        assert_eq!(
            service.facet_function_selectors(module(2)).await,
            vec![sel(1)]
        );
    }

    /// Add followed by Remove of the same selector within one batch is
    /// well-defined: later operations see earlier effects.
    #[tokio::test]
    async fn test_add_then_remove_within_one_batch() {
        let service = service_with_echo_modules(&[module(1)]);

        service
            .submit_cut(
                operator(),
                vec![
                    CutOp::add(module(1), vec![sel(1)]),
                    CutOp::remove(vec![sel(1)]),
                ],
                None,
            )
            .await
            .unwrap();

        assert_eq!(service.facet_address(sel(1)).await, None);
        assert!(service.facet_addresses().await.is_empty());
    }

    // =============================================================================
    // ATOMIC ABORTS
    // =============================================================================

    /// Property: a batch with one valid operation followed by one
    /// invalid operation commits nothing.
    #[tokio::test]
    async fn test_valid_then_invalid_operation_commits_nothing() {
        let service = service_with_echo_modules(&[module(1), module(2)]);
        let before = loupe_snapshot(&service).await;

        let batch = vec![
            CutOp::add(module(1), vec![sel(1)]),
            // Invalid: sel(1) was just mapped by the previous operation.
            CutOp::add(module(2), vec![sel(1)]),
        ];
        let err = service
            .submit_cut(operator(), batch, None)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            CutError::SelectorAlreadyMapped {
                index: 1,
                selector: sel(1),
            }
        );
        assert_eq!(loupe_snapshot(&service).await, before);
        assert_eq!(service.facet_address(sel(1)).await, None);
        // An aborted batch reaches no observer.
        assert!(service.events().cuts().is_empty());
        assert_eq!(service.stats().await.cuts_aborted, 1);
    }

    /// Property: submissions from a non-authorized caller always fail
    /// with Unauthorized, even when every operation is well-formed.
    #[tokio::test]
    async fn test_unauthorized_submission_always_rejected() {
        let service = service_with_echo_modules(&[module(1)]);

        let err = service
            .submit_cut(outsider(), vec![CutOp::add(module(1), vec![sel(1)])], None)
            .await
            .unwrap_err();

        assert!(
            matches!(err, CutError::Gate(GateError::Unauthorized { caller }) if caller == outsider())
        );
        assert!(loupe_snapshot(&service).await.is_empty());
        assert_eq!(service.stats().await.rejected_submissions, 1);
    }

    // =============================================================================
    // DISPATCH
    // =============================================================================

    /// Property: dispatch to an unmapped selector fails with
    /// FunctionNotFound and changes no observable state.
    #[tokio::test]
    async fn test_dispatch_unmapped_selector_changes_nothing() {
        let service = service_with_echo_modules(&[module(1)]);
        service
            .submit_cut(operator(), vec![CutOp::add(module(1), vec![sel(1)])], None)
            .await
            .unwrap();
        let before = loupe_snapshot(&service).await;

        let err = service
            .dispatch(outsider(), sel(2), Bytes::new())
            .await
            .unwrap_err();

        assert_eq!(err, DispatchError::FunctionNotFound(sel(2)));
        assert_eq!(loupe_snapshot(&service).await, before);
    }

    /// A module failure propagates verbatim and unwinds every storage
    /// effect the failed call made.
    #[tokio::test]
    async fn test_module_failure_unwinds_storage_effects() {
        let service = create_test_service(operator());
        let ns = namespace_key("facet.tests.counter");

        // Writer: increments its slot, then optionally reverts.
        service.host().register_fn(module(1), move |ctx, payload| {
            let next = ctx.read(ns, StorageKey::ZERO).to_u256() + U256::one();
            ctx.write(ns, StorageKey::ZERO, StorageValue::from_u256(next));
            if payload == b"fail" {
                return Err(ModuleError::Revert("forced revert".to_string()));
            }
            Ok(Bytes::new())
        });
        // Reader: returns the slot as 32 big-endian bytes.
        service.host().register_fn(module(2), move |ctx, _payload| {
            Ok(Bytes::from_slice(ctx.read(ns, StorageKey::ZERO).as_bytes()))
        });

        service
            .submit_cut(
                operator(),
                vec![
                    CutOp::add(module(1), vec![sel(1)]),
                    CutOp::add(module(2), vec![sel(2)]),
                ],
                None,
            )
            .await
            .unwrap();

        // Failing call: the increment must not survive.
        let err = service
            .dispatch(outsider(), sel(1), Bytes::from_slice(b"fail"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DispatchError::Module(ModuleError::Revert("forced revert".to_string()))
        );

        let out = service
            .dispatch(outsider(), sel(2), Bytes::new())
            .await
            .unwrap();
        assert_eq!(U256::from_big_endian(out.as_slice()), U256::zero());

        // Successful call: the increment commits.
        service
            .dispatch(outsider(), sel(1), Bytes::new())
            .await
            .unwrap();
        let out = service
            .dispatch(outsider(), sel(2), Bytes::new())
            .await
            .unwrap();
        assert_eq!(U256::from_big_endian(out.as_slice()), U256::one());
    }

    /// Routing entries survive the host losing a module's code; the
    /// dispatch then fails without touching state.
    #[tokio::test]
    async fn test_dispatch_after_host_lost_code() {
        let service = service_with_echo_modules(&[module(1)]);
        service
            .submit_cut(operator(), vec![CutOp::add(module(1), vec![sel(1)])], None)
            .await
            .unwrap();

        assert!(service.host().deregister(module(1)));

        let err = service
            .dispatch(outsider(), sel(1), Bytes::new())
            .await
            .unwrap_err();
        assert_eq!(err, DispatchError::ModuleHasNoCode(module(1)));
        // Still routed; a redeploy at the same handle heals dispatch.
        assert_eq!(service.facet_address(sel(1)).await, Some(module(1)));
    }

    // =============================================================================
    // EVENTS
    // =============================================================================

    /// One committed event describes every operation of the batch, in
    /// application order.
    #[tokio::test]
    async fn test_cut_committed_event_lists_every_operation() {
        let service = service_with_echo_modules(&[module(1), module(2)]);

        let batch = vec![
            CutOp::add(module(1), vec![sel(1), sel(2)]),
            CutOp::add(module(2), vec![sel(3)]),
            CutOp::remove(vec![sel(2)]),
        ];
        let receipt = service
            .submit_cut(operator(), batch.clone(), None)
            .await
            .unwrap();

        let cuts = service.events().cuts();
        assert_eq!(cuts.len(), 1);
        assert_eq!(cuts[0].batch_id, receipt.batch_id);
        assert_eq!(cuts[0].init_module, None);
        let expected: Vec<CutOpRecord> = batch.iter().map(CutOpRecord::from).collect();
        assert_eq!(cuts[0].operations, expected);
    }
}
