#[cfg(test)]
mod tests {
    use depad_core::stream::scratch::ScratchPool;

    #[test]
    fn rented_buffers_have_requested_len() {
        let pool = ScratchPool::new(2);
        let buf = pool.rent(64);
        assert_eq!(buf.len(), 64);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn buffers_are_zeroed_before_reuse() {
        let pool = ScratchPool::new(2);
        {
            let mut buf = pool.rent(32);
            buf.fill(0xAB);
        }
        assert_eq!(pool.idle_len(), 1);

        let buf = pool.rent(48);
        assert_eq!(buf.len(), 48);
        assert!(buf.iter().all(|&b| b == 0));
        assert_eq!(pool.idle_len(), 0);
    }

    #[test]
    fn full_pool_drops_extra_buffers() {
        let pool = ScratchPool::new(2);
        {
            let _a = pool.rent(8);
            let _b = pool.rent(8);
            let _c = pool.rent(8);
        }
        assert_eq!(pool.idle_len(), 2);
    }

    #[test]
    fn shared_pool_is_a_singleton() {
        assert!(std::ptr::eq(ScratchPool::shared(), ScratchPool::shared()));
    }
}
