//! # Structural Tier Tests (T0-T5)
//!
//! If ANY tier fails, the structure is INVALID.
//!
//! ## Tiers
//! - T0: Composite ordering and removal
//! - T1: Decorator nesting
//! - T2: Proxy memoization
//! - T3: Flyweight identity
//! - T4: Bridge independence
//! - T5: End-to-end scene

use strata_core::{
    Component, ComponentRef, Composite, Dot, Point, Render, StrataError, attach, detach,
};

// =============================================================================
// TIER T0: COMPOSITE
// =============================================================================

mod t0_composite {
    use super::*;

    /// T0.1: Render visits children in insertion order.
    #[test]
    fn render_in_insertion_order() {
        let root = ComponentRef::new(Composite::new());
        for x in [9, 2, 7, 4] {
            attach(&root, ComponentRef::new(Dot::new(x, 0))).expect("attach");
        }

        let render = root.render().expect("render");
        assert_eq!(
            render.lines(),
            ["dot at (9, 0)", "dot at (2, 0)", "dot at (7, 0)", "dot at (4, 0)"]
        );
    }

    /// T0.2: Removing a non-child fails with NotFound.
    #[test]
    fn remove_non_child_not_found() {
        let root = ComponentRef::new(Composite::new());
        let stranger = ComponentRef::new(Dot::new(0, 0));

        assert_eq!(
            detach(&root, &stranger).expect_err("stranger"),
            StrataError::NotFound
        );
    }

    /// T0.3: A composite never contains itself.
    #[test]
    fn cycles_rejected() {
        let a = ComponentRef::new(Composite::new());
        let b = ComponentRef::new(Composite::new());
        let c = ComponentRef::new(Composite::new());
        attach(&a, b.clone()).expect("a <- b");
        attach(&b, c.clone()).expect("b <- c");

        assert_eq!(attach(&c, a.clone()), Err(StrataError::CycleDetected));
        assert_eq!(attach(&a, a.clone()), Err(StrataError::CycleDetected));
        assert_eq!(a.node_count(), 3);
    }

    /// T0.4: A cycle through a decorator is still a cycle.
    #[test]
    fn cycle_through_decorator_rejected() {
        use strata_core::{Decorator, Encryption};

        let group = ComponentRef::new(Composite::new());
        let wrapped = Decorator::wrap(Encryption, group.clone());

        assert_eq!(attach(&group, wrapped), Err(StrataError::CycleDetected));
    }

    /// T0.5: Deep chains of shared subtrees are checked once per distinct node.
    #[test]
    fn shared_diamond_chain_attaches() {
        let base = ComponentRef::new(Composite::new());
        let mut chain = base.clone();
        for _ in 0..30 {
            chain = ComponentRef::new(Composite::with_children(vec![chain.clone(), chain]));
        }
        assert_eq!(chain.node_count(), 31);

        let root = ComponentRef::new(Composite::new());
        attach(&root, chain.clone()).expect("attach diamond chain");
        attach(&root, chain).expect("attach it twice");

        assert_eq!(root.node_count(), 32);
        assert_eq!(attach(&base, root), Err(StrataError::CycleDetected));
    }

    /// T0.6: Adding to a leaf is not supported.
    #[test]
    fn leaf_rejects_children() {
        let leaf = ComponentRef::new(Dot::new(0, 0));
        let err = attach(&leaf, ComponentRef::new(Dot::new(1, 1))).expect_err("leaf");
        assert!(matches!(err, StrataError::OperationNotSupported { .. }));
    }
}

// =============================================================================
// TIER T1: DECORATOR
// =============================================================================

mod t1_decorator {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use strata_core::{Compression, Decorator, Encryption, Outline};

    #[derive(Debug)]
    struct CountingLeaf(Arc<AtomicUsize>);

    impl Component for CountingLeaf {
        fn kind(&self) -> &'static str {
            "counting"
        }

        fn apply_transform(&mut self, _dx: i64, _dy: i64) {}

        fn render(&self) -> Result<Render, StrataError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Render::line("leaf"))
        }
    }

    /// T1.1: Encrypt(Compress(leaf)) is strictly LIFO and runs the leaf once.
    #[test]
    fn lifo_nesting() {
        let calls = Arc::new(AtomicUsize::new(0));
        let leaf = ComponentRef::new(CountingLeaf(Arc::clone(&calls)));
        let chain = Decorator::wrap(Encryption, Decorator::wrap(Compression, leaf));

        let render = chain.render().expect("render");

        assert_eq!(
            render.lines(),
            ["encrypt", "compress", "leaf", "decompress", "decrypt"]
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    /// T1.2: Order of construction decides order of execution.
    #[test]
    fn reversed_chain_reverses_output() {
        let leaf = ComponentRef::new(Dot::new(0, 0));
        let chain = Decorator::wrap(Compression, Decorator::wrap(Encryption, leaf));

        assert_eq!(
            chain.render().expect("render").lines(),
            ["compress", "encrypt", "dot at (0, 0)", "decrypt", "decompress"]
        );
    }

    /// T1.3: A decorator can wrap a whole composite.
    #[test]
    fn decorate_a_subtree() {
        let group = ComponentRef::new(Composite::with_children(vec![
            ComponentRef::new(Dot::new(1, 1)),
            ComponentRef::new(Dot::new(2, 2)),
        ]));
        let framed = Decorator::wrap(Outline::new("blue"), group);

        assert_eq!(
            framed.render().expect("render").lines(),
            [
                "begin blue outline",
                "  dot at (1, 1)",
                "  dot at (2, 2)",
                "end blue outline",
            ]
        );
    }
}

// =============================================================================
// TIER T2: PROXY
// =============================================================================

mod t2_proxy {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use strata_core::{Invalidate, VideoId, VideoProxy, VideoService};

    #[derive(Debug, Default)]
    struct FlakyService {
        calls: AtomicU64,
        fail_next: std::sync::atomic::AtomicBool,
    }

    impl FlakyService {
        fn take_call(&self) -> Result<u64, StrataError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(StrataError::DelegationFailure("timeout".to_string()));
            }
            Ok(n)
        }
    }

    impl VideoService for FlakyService {
        fn list(&self) -> Result<String, StrataError> {
            Ok(format!("list v{}", self.take_call()?))
        }

        fn info(&self, id: VideoId) -> Result<String, StrataError> {
            Ok(format!("info {id} v{}", self.take_call()?))
        }

        fn download(&self, id: VideoId) -> Result<String, StrataError> {
            Ok(format!("video {id} v{}", self.take_call()?))
        }
    }

    /// T2.1: One delegation, then none, then one more after invalidate.
    #[test]
    fn memoization_law() {
        let proxy = VideoProxy::new(FlakyService::default());

        let first = proxy.info(VideoId(5)).expect("first");
        assert_eq!(proxy.service().calls.load(Ordering::SeqCst), 1);

        let second = proxy.info(VideoId(5)).expect("second");
        assert_eq!(first, second);
        assert_eq!(proxy.service().calls.load(Ordering::SeqCst), 1);

        proxy.invalidate();
        let third = proxy.info(VideoId(5)).expect("third");
        assert_ne!(third, first);
        assert_eq!(proxy.service().calls.load(Ordering::SeqCst), 2);
    }

    /// T2.2: A failed delegation propagates unchanged and is not cached.
    #[test]
    fn failure_leaves_slot_empty() {
        let proxy = VideoProxy::new(FlakyService::default());
        proxy.service().fail_next.store(true, Ordering::SeqCst);

        let err = proxy.download(VideoId(1)).expect_err("flaky");
        assert_eq!(err, StrataError::DelegationFailure("timeout".to_string()));
        assert!(proxy.cache().is_empty());

        let ok = proxy.download(VideoId(1)).expect("retry");
        assert_eq!(ok, "video #1 v2");
    }

    /// T2.3: Concurrent identical requests delegate once.
    #[test]
    fn concurrent_requests_delegate_once() {
        let proxy = VideoProxy::new(FlakyService::default());

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| proxy.list().expect("list"));
            }
        });

        assert_eq!(proxy.service().calls.load(Ordering::SeqCst), 1);
        assert_eq!(proxy.cache().misses(), 1);
        assert_eq!(proxy.cache().hits(), 7);
    }
}

// =============================================================================
// TIER T3: FLYWEIGHT
// =============================================================================

mod t3_flyweight {
    use super::*;
    use std::sync::Arc;
    use strata_core::{FlyweightPool, TreeKey, TreeType, plant};

    /// T3.1: Three requests with one key leave exactly one shared object.
    #[test]
    fn one_key_one_object() {
        let pool: FlyweightPool<TreeKey, TreeType> = FlyweightPool::new();
        let key = TreeKey::new("african", "red", "smooth");

        let handles: Vec<_> = (0..3).map(|_| pool.get_or_create(&key)).collect();

        assert_eq!(pool.len(), 1);
        assert!(Arc::ptr_eq(&handles[0], &handles[1]));
        assert!(Arc::ptr_eq(&handles[1], &handles[2]));
    }

    /// T3.2: A forest of trees is a composite of flyweights.
    #[test]
    fn forest_is_a_composite() {
        let pool = FlyweightPool::new();
        let oak = TreeKey::new("oak", "green", "rough");
        let forest = ComponentRef::new(Composite::with_children(vec![
            ComponentRef::new(plant(&pool, &oak, 0, 0)),
            ComponentRef::new(plant(&pool, &oak, 3, 1)),
        ]));

        forest.apply_transform(1, 1);

        assert_eq!(pool.len(), 1);
        assert_eq!(
            forest.render().expect("render").lines(),
            ["green rough oak tree at (1, 1)", "green rough oak tree at (4, 2)"]
        );
    }
}

// =============================================================================
// TIER T4: BRIDGE
// =============================================================================

mod t4_bridge {
    use strata_core::{AdvancedRemote, Device, DeviceState, Radio, Remote, RemoteControl, Tv};

    /// T4.1: Operating one device never touches another.
    #[test]
    fn devices_are_independent() {
        let mut tv = Tv::new();
        let mut radio = Radio::new();
        let before = DeviceState::of(&radio);

        {
            let mut remote = AdvancedRemote::new(&mut tv);
            remote.toggle_power();
            remote.volume_up();
            remote.channel_up();
            remote.mute();
        }

        assert_eq!(DeviceState::of(&radio), before);
        assert!(tv.is_enabled());
        assert_eq!(tv.channel(), 1);

        Remote::new(&mut radio).volume_up();
        assert_eq!(radio.volume(), 10);
        assert_eq!(tv.volume(), 0);
    }
}

// =============================================================================
// TIER T5: END-TO-END
// =============================================================================

mod t5_end_to_end {
    use super::*;

    /// T5.1: Transform a two-level tree and render it.
    #[test]
    fn transform_and_render_tree() {
        let near = ComponentRef::new(Dot::new(1, 2));
        let far = ComponentRef::new(Dot::new(5, 9));
        let subtree = ComponentRef::new(Composite::new());
        attach(&subtree, far.clone()).expect("subtree");

        let root = ComponentRef::new(Composite::new());
        attach(&root, near.clone()).expect("near");
        attach(&root, subtree).expect("subtree");

        root.apply_transform(2, 2);

        assert_eq!(near.position(), Some(Point::new(3, 4)));
        assert_eq!(far.position(), Some(Point::new(7, 11)));
        assert_eq!(
            root.render().expect("render").lines(),
            ["dot at (3, 4)", "dot at (7, 11)"]
        );
    }
}
