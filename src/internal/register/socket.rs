//! Socket register block definitions
//!
//! Offsets are relative to the socket's own register block
//! ([`Block::Socket`](super::Block::Socket)).

/// Socket Mode Register
pub const MR: u16 = 0x00;
/// Socket Command Register
pub const CR: u16 = 0x01;
/// Socket Interrupt Register (write 1 to clear)
pub const IR: u16 = 0x02;
/// Socket Status Register
pub const SR: u16 = 0x03;
/// Source Port Register (2 bytes)
pub const PORT: u16 = 0x04;
/// Destination IP Address Register (4 bytes)
pub const DIPR: u16 = 0x0C;
/// Destination Port Register (2 bytes)
pub const DPORT: u16 = 0x10;
/// Maximum Segment Size Register (2 bytes)
pub const MSSR: u16 = 0x12;
/// RX Buffer Size Register (KB)
pub const RXBUF_SIZE: u16 = 0x1E;
/// TX Buffer Size Register (KB)
pub const TXBUF_SIZE: u16 = 0x1F;
/// TX Free Size Register (2 bytes)
pub const TX_FSR: u16 = 0x20;
/// TX Read Pointer Register (2 bytes)
pub const TX_RD: u16 = 0x22;
/// TX Write Pointer Register (2 bytes)
pub const TX_WR: u16 = 0x24;
/// RX Received Size Register (2 bytes)
pub const RX_RSR: u16 = 0x26;
/// RX Read Pointer Register (2 bytes)
pub const RX_RD: u16 = 0x28;
/// RX Write Pointer Register (2 bytes)
pub const RX_WR: u16 = 0x2A;

/// Sn_MR protocol field values
pub mod mode {
    /// Socket closed
    pub const CLOSED: u8 = 0x00;
    /// TCP
    pub const TCP: u8 = 0x01;
    /// UDP
    pub const UDP: u8 = 0x02;
    /// MAC raw (socket 0 only)
    pub const MACRAW: u8 = 0x04;
    /// Protocol field mask (bits 3:0)
    pub const PROTOCOL_MASK: u8 = 0x0F;
}

/// Sn_CR command values
pub mod cmd {
    /// Initialize the socket according to Sn_MR
    pub const OPEN: u8 = 0x01;
    /// Wait for an incoming TCP connection
    pub const LISTEN: u8 = 0x02;
    /// Open a TCP connection to Sn_DIPR:Sn_DPORT
    pub const CONNECT: u8 = 0x04;
    /// Start the TCP FIN handshake
    pub const DISCON: u8 = 0x08;
    /// Close the socket unconditionally
    pub const CLOSE: u8 = 0x10;
    /// Transmit data between TX_RD and TX_WR
    pub const SEND: u8 = 0x20;
    /// UDP send without ARP, using Sn_DHAR
    pub const SEND_MAC: u8 = 0x21;
    /// TCP keep-alive probe
    pub const SEND_KEEP: u8 = 0x22;
    /// Commit the RX read pointer
    pub const RECV: u8 = 0x40;
}

/// Sn_SR status values
pub mod status {
    /// Socket closed
    pub const CLOSED: u8 = 0x00;
    /// TCP socket opened
    pub const INIT: u8 = 0x13;
    /// Waiting for a connection
    pub const LISTEN: u8 = 0x14;
    /// SYN sent
    pub const SYNSENT: u8 = 0x15;
    /// SYN received
    pub const SYNRECV: u8 = 0x16;
    /// Connection established
    pub const ESTABLISHED: u8 = 0x17;
    /// FIN sent, waiting
    pub const FIN_WAIT: u8 = 0x18;
    /// Simultaneous close
    pub const CLOSING: u8 = 0x1A;
    /// Waiting out the 2MSL timer
    pub const TIME_WAIT: u8 = 0x1B;
    /// Peer sent FIN
    pub const CLOSE_WAIT: u8 = 0x1C;
    /// Waiting for the last ACK
    pub const LAST_ACK: u8 = 0x1D;
    /// UDP socket opened
    pub const UDP: u8 = 0x22;
    /// MACRAW socket opened
    pub const MACRAW: u8 = 0x42;
}

/// Sn_IR interrupt bits
pub mod ir {
    /// Connection established
    pub const CON: u8 = 1 << 0;
    /// FIN or FIN/ACK received
    pub const DISCON: u8 = 1 << 1;
    /// Data received
    pub const RECV: u8 = 1 << 2;
    /// ARP or TCP timeout
    pub const TIMEOUT: u8 = 1 << 3;
    /// SEND command completed
    pub const SEND_OK: u8 = 1 << 4;
}
