//! # Upgrade Lifecycle Tests
//!
//! End-to-end walkthroughs of the upgrade surface: staged add / replace
//! / remove sequences, init hooks running inside the commit, storage
//! namespace isolation, and authority hand-over.

#[cfg(test)]
mod tests {
    use facet_core::prelude::*;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn operator() -> Address {
        Address::new([0xAD; 20])
    }

    fn caller() -> Address {
        Address::new([0xEE; 20])
    }

    fn module(tag: u8) -> Address {
        Address::new([tag; 20])
    }

    fn sel(tag: u8) -> Selector {
        Selector::new([0, 0, 0, tag])
    }

    fn echo(
        service: &FacetCoreService<InMemoryModuleHost, RecordingEventSink>,
        modules: &[Address],
    ) {
        for &m in modules {
            service
                .host()
                .register_fn(m, |_ctx, payload| Ok(Bytes::from_slice(payload)));
        }
    }

    // =============================================================================
    // STAGED UPGRADE WALKTHROUGH
    // =============================================================================

    /// Add two selectors to module A, replace one with module B, then
    /// remove the other; the loupe tracks every stage.
    #[tokio::test]
    async fn test_staged_add_replace_remove_walkthrough() {
        let service = create_test_service(operator());
        let module_a = module(0xA1);
        let module_b = module(0xB1);
        echo(&service, &[module_a, module_b]);

        // Stage 1: Add(A, [0x01, 0x02]).
        service
            .submit_cut(
                operator(),
                vec![CutOp::add(module_a, vec![sel(1), sel(2)])],
                None,
            )
            .await
            .unwrap();
        assert_eq!(service.facet_addresses().await, vec![module_a]);
        assert_eq!(
            service.facet_function_selectors(module_a).await,
            vec![sel(1), sel(2)]
        );

        // Stage 2: Replace(B, [0x01]).
        service
            .submit_cut(
                operator(),
                vec![CutOp::replace(module_b, vec![sel(1)])],
                None,
            )
            .await
            .unwrap();
        assert_eq!(service.facet_address(sel(1)).await, Some(module_b));
        assert_eq!(service.facet_address(sel(2)).await, Some(module_a));

        // Stage 3: Remove(null, [0x02]).
        service
            .submit_cut(operator(), vec![CutOp::remove(vec![sel(2)])], None)
            .await
            .unwrap();
        assert!(service.facet_function_selectors(module_a).await.is_empty());
        assert_eq!(service.facet_addresses().await, vec![module_b]);
    }

    /// A module fully removed and later re-added reappears at the end of
    /// the facet order.
    #[tokio::test]
    async fn test_removed_module_reappears_at_the_end() {
        let service = create_test_service(operator());
        echo(&service, &[module(1), module(2)]);

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
        assert_eq!(service.facet_addresses().await, vec![module(1), module(2)]);

        service
            .submit_cut(operator(), vec![CutOp::remove(vec![sel(1)])], None)
            .await
            .unwrap();
        service
            .submit_cut(operator(), vec![CutOp::add(module(1), vec![sel(3)])], None)
            .await
            .unwrap();

        assert_eq!(service.facet_addresses().await, vec![module(2), module(1)]);
    }

    // =============================================================================
    // INIT HOOKS
    // =============================================================================

    /// The init hook runs once, inside the commit, against the shared
    /// arena: its writes are visible to dispatches after the cut.
    #[tokio::test]
    async fn test_init_hook_seeds_state_within_commit() {
        let service = create_test_service(operator());
        let ns = namespace_key("facet.tests.config");
        let version_key = StorageKey::from_u256(U256::from(1));

        // Init logic: stores the schema version carried in the payload.
        let init_module = module(0x10);
        service
            .host()
            .register_fn(init_module, move |ctx, payload| {
                let version = U256::from_big_endian(payload);
                ctx.write(ns, version_key, StorageValue::from_u256(version));
                Ok(Bytes::new())
            });
        // Reader facet.
        let reader = module(0x11);
        service.host().register_fn(reader, move |ctx, _payload| {
            Ok(Bytes::from_slice(ctx.read(ns, version_key).as_bytes()))
        });

        let mut payload = [0u8; 32];
        U256::from(3).to_big_endian(&mut payload);
        let receipt = service
            .submit_cut(
                operator(),
                vec![CutOp::add(reader, vec![sel(1)])],
                Some(InitCall::new(init_module, Bytes::from_slice(&payload))),
            )
            .await
            .unwrap();

        let out = service.dispatch(caller(), sel(1), Bytes::new()).await.unwrap();
        assert_eq!(U256::from_big_endian(out.as_slice()), U256::from(3));

        let cuts = service.events().cuts();
        assert_eq!(cuts[0].batch_id, receipt.batch_id);
        assert_eq!(cuts[0].init_module, Some(init_module));
    }

    /// A failing init hook rolls back the whole batch: registry and
    /// arena are both as if the submission never happened.
    #[tokio::test]
    async fn test_init_hook_failure_rolls_back_everything() {
        let service = create_test_service(operator());
        let ns = namespace_key("facet.tests.config");

        // Baseline reader facet over the namespace the hook writes.
        let reader = module(0x11);
        service.host().register_fn(reader, move |ctx, _payload| {
            Ok(Bytes::from_slice(ctx.read(ns, StorageKey::ZERO).as_bytes()))
        });
        service
            .submit_cut(operator(), vec![CutOp::add(reader, vec![sel(1)])], None)
            .await
            .unwrap();
        let before = service.facets().await;

        // Hook writes, then fails.
        let init_module = module(0x10);
        service
            .host()
            .register_fn(init_module, move |ctx, _payload| {
                ctx.write(ns, StorageKey::ZERO, StorageValue::from_u256(U256::from(7)));
                Err(ModuleError::Internal("migration step 2 failed".to_string()))
            });

        let new_facet = module(0x12);
        service
            .host()
            .register_fn(new_facet, |_ctx, _payload| Ok(Bytes::new()));

        let err = service
            .submit_cut(
                operator(),
                vec![CutOp::add(new_facet, vec![sel(2)])],
                Some(InitCall::new(init_module, Bytes::new())),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CutError::InitHookFailed { module: m, .. } if m == init_module));

        // Registry rolled back.
        assert_eq!(service.facets().await, before);
        assert_eq!(service.facet_address(sel(2)).await, None);
        // Arena rolled back: the hook's write is gone.
        let out = service.dispatch(caller(), sel(1), Bytes::new()).await.unwrap();
        assert_eq!(U256::from_big_endian(out.as_slice()), U256::zero());
        // Only the baseline commit was observed.
        assert_eq!(service.events().cuts().len(), 1);
    }

    /// An init module unknown to the host aborts the batch.
    #[tokio::test]
    async fn test_init_module_without_code_aborts() {
        let service = create_test_service(operator());
        echo(&service, &[module(1)]);

        let ghost = module(0x66);
        let err = service
            .submit_cut(
                operator(),
                vec![CutOp::add(module(1), vec![sel(1)])],
                Some(InitCall::new(ghost, Bytes::new())),
            )
            .await
            .unwrap_err();

        assert_eq!(err, CutError::InitModuleHasNoCode { module: ghost });
        assert!(service.facets().await.is_empty());
    }

    // =============================================================================
    // NAMESPACE ISOLATION
    // =============================================================================

    /// Two modules using the same slot key under different namespaces
    /// never observe each other's values.
    #[tokio::test]
    async fn test_storage_namespaces_are_isolated() {
        let service = create_test_service(operator());
        let ns_a = namespace_key("facet.core.staking");
        let ns_b = namespace_key("facet.core.lottery");

        fn counter(
            ns: NamespaceKey,
            step: u64,
        ) -> impl Fn(&mut CallContext<'_>, &[u8]) -> Result<Bytes, ModuleError> + Send + Sync + 'static
        {
            move |ctx, _payload| {
                let next = ctx.read(ns, StorageKey::ZERO).to_u256() + U256::from(step);
                ctx.write(ns, StorageKey::ZERO, StorageValue::from_u256(next));
                Ok(Bytes::from_slice(StorageValue::from_u256(next).as_bytes()))
            }
        }
        service.host().register_fn(module(1), counter(ns_a, 1));
        service.host().register_fn(module(2), counter(ns_b, 10));

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

        service.dispatch(caller(), sel(1), Bytes::new()).await.unwrap();
        service.dispatch(caller(), sel(2), Bytes::new()).await.unwrap();
        let out_a = service.dispatch(caller(), sel(1), Bytes::new()).await.unwrap();
        let out_b = service.dispatch(caller(), sel(2), Bytes::new()).await.unwrap();

        assert_eq!(U256::from_big_endian(out_a.as_slice()), U256::from(2));
        assert_eq!(U256::from_big_endian(out_b.as_slice()), U256::from(20));
    }

    // =============================================================================
    // AUTHORITY HAND-OVER
    // =============================================================================

    /// Transfer moves the gate: the old authority loses access, the new
    /// one gains it, and the hand-over is observable.
    #[tokio::test]
    async fn test_authority_transfer_flow() {
        let service = create_test_service(operator());
        echo(&service, &[module(1)]);
        let successor = Address::new([0xBB; 20]);

        service
            .transfer_authority(operator(), successor)
            .await
            .unwrap();
        assert_eq!(service.authority().await, successor);

        // Old authority is now an outsider.
        let err = service
            .submit_cut(operator(), vec![CutOp::add(module(1), vec![sel(1)])], None)
            .await
            .unwrap_err();
        assert!(matches!(err, CutError::Gate(GateError::Unauthorized { .. })));

        // New authority operates the gate, including further transfers.
        service
            .submit_cut(successor, vec![CutOp::add(module(1), vec![sel(1)])], None)
            .await
            .unwrap();
        let err = service
            .transfer_authority(successor, Address::ZERO)
            .await
            .unwrap_err();
        assert_eq!(err, GateError::NullAuthority);

        let transfers = service.events().transfers();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].previous, operator());
        assert_eq!(transfers[0].new_authority, successor);
    }
}
