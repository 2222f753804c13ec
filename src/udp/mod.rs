// Datagram echo standing in for the simulator's UDP circuit endpoint.

use std::io;
use std::net::SocketAddr;
use tokio::net::{ToSocketAddrs, UdpSocket};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Largest datagram echoed back; the viewer protocol keeps packets under the MTU
pub const MAX_DATAGRAM: usize = 1500;

pub struct UdpEcho {
    socket: UdpSocket,
}

impl UdpEcho {
    pub async fn bind<A: ToSocketAddrs>(addr: A) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        Ok(Self { socket })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Echo datagrams until `shutdown` fires (or its sender is dropped).
    /// Returns the number of datagrams echoed.
    pub async fn run(self, mut shutdown: oneshot::Receiver<()>) -> io::Result<u64> {
        let mut buf = [0u8; MAX_DATAGRAM];
        let mut echoed = 0u64;
        info!(addr = ?self.socket.local_addr().ok(), "UDP echo listening");

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                received = self.socket.recv_from(&mut buf) => {
                    let (len, peer) = match received {
                        Ok(r) => r,
                        // ICMP port-unreachable from an earlier send surfaces here on some platforms
                        Err(e) if e.kind() == io::ErrorKind::ConnectionReset => {
                            warn!(error = %e, "Ignoring receive error");
                            continue;
                        }
                        Err(e) => return Err(e),
                    };
                    self.socket.send_to(&buf[..len], peer).await?;
                    echoed += 1;
                    debug!(peer = %peer, bytes = len, "Echoed datagram");
                }
            }
        }

        info!(echoed, "UDP echo stopped");
        Ok(echoed)
    }
}
